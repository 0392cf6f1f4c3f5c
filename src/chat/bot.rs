//! The conversation state machine.
//!
//! [`Chatbot::process`] takes one raw message and returns one reply. Each
//! handler validates everything before it commits: the state transition and
//! the session fields it owns are written only once the turn has succeeded, so
//! a rejected or failed turn leaves the session as it found it.

use std::collections::HashMap;

use super::format::{
    format_customer_info, format_order_list, format_order_summary, format_selected_services,
    format_services_list,
};
use super::menu::{
    FieldKind, MenuAction, UpdateField, is_restart_command, match_menu_action, match_update_field,
};
use super::parse::{
    SelectionError, missing_keys, parse_id_list, parse_key_values, parse_selection_index,
};
use super::prompts;
use super::state::{AuthSession, ConversationState, OrderDraft, Session};
use super::validate::{
    validate_date, validate_email, validate_future_date, validate_mobile, validate_name,
    validate_postcode,
};
use crate::config::BotConfig;
use crate::error::TurnError;
use crate::models::{Customer, OrderAddress, OrderRequest, OrderUpdateRequest, ServiceRecord};
use crate::services::Services;
use crate::services::order::check_updatable;

const REGISTRATION_FIELDS: &[&str] = &["first_name", "last_name", "mobile", "email", "password"];

const ORDER_DETAIL_FIELDS: &[&str] = &[
    "pickup_date",
    "pickup_time",
    "drop-off_date",
    "drop-off_time",
    "collection_option",
    "delivery_option",
];

const ADDRESS_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "contact_number",
    "address_line_1",
    "postcode",
];

type TurnResult = Result<String, TurnError>;

/// One conversation with one customer.
pub struct Chatbot {
    services: Services,
    config: BotConfig,
    session: Session,
}

impl Chatbot {
    pub fn new(services: Services, config: BotConfig) -> Self {
        Self {
            services,
            config,
            session: Session::new(),
        }
    }

    pub fn state(&self) -> ConversationState {
        self.session.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle one user message and produce the reply.
    ///
    /// Restart keywords win over whatever state the conversation is in.
    pub async fn process(&mut self, message: &str) -> String {
        if is_restart_command(message) {
            return self.restart();
        }
        let state = self.session.state;
        let result = self.dispatch(message).await;
        self.finish_turn(state, result)
    }

    /// Clear the session and greet the user again.
    pub fn restart(&mut self) -> String {
        tracing::info!(from = %self.session.state, "Conversation restarted");
        self.session.reset();
        let result = self.handle_start();
        self.finish_turn(ConversationState::Start, result)
    }

    fn finish_turn(&self, state: ConversationState, result: TurnResult) -> String {
        match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(state = %state, error = %e, "Turn failed");
                prompts::SOMETHING_WENT_WRONG.to_string()
            }
        }
    }

    async fn dispatch(&mut self, message: &str) -> TurnResult {
        let state = self.session.state;
        if state.requires_auth() && !self.session.is_authenticated() {
            return Err(TurnError::NotAuthenticated);
        }
        tracing::debug!(state = %state, "Dispatching message");

        match state {
            ConversationState::Start => self.handle_start(),
            ConversationState::AwaitingPostcode => self.handle_postcode(message).await,
            ConversationState::AwaitingCustomerDetails => self.handle_registration(message).await,
            ConversationState::Authenticated => self.handle_menu(message).await,
            ConversationState::AwaitingServiceSelection => self.handle_service_selection(message),
            ConversationState::AwaitingOrderDetails => self.handle_order_details(message),
            ConversationState::AwaitingAddressDetails => self.handle_address_details(message).await,
            ConversationState::AwaitingUpdateSelection => self.handle_update_selection(message),
            ConversationState::AwaitingUpdateValue => self.handle_update_value(message),
            ConversationState::AwaitingUpdateInput => self.handle_update_input(message).await,
        }
    }

    fn handle_start(&mut self) -> TurnResult {
        self.session.reset();
        self.session.transition_to(ConversationState::AwaitingPostcode)?;
        Ok(prompts::WELCOME.to_string())
    }

    async fn handle_postcode(&mut self, message: &str) -> TurnResult {
        let postcode = message.trim().to_uppercase();
        if !validate_postcode(&postcode) {
            return Ok("❌ Please enter a valid postcode.".to_string());
        }

        let check = match self.services.postcodes.validate(&postcode).await {
            Ok(check) => check,
            Err(e) => return Ok(format!("❌ {}", e.message)),
        };
        if !check.is_valid {
            return Ok(prompts::not_serviceable(&check.message));
        }

        self.session
            .transition_to(ConversationState::AwaitingCustomerDetails)?;
        self.session.postcode = Some(postcode);
        Ok(prompts::registration_form(&check.message))
    }

    async fn handle_registration(&mut self, message: &str) -> TurnResult {
        let fields = parse_key_values(message);
        let missing = missing_keys(&fields, REGISTRATION_FIELDS);
        if !missing.is_empty() {
            return Ok(format!(
                "{}\n\nPlease provide all required information.",
                prompts::missing_fields(&missing)
            ));
        }

        let first_name = value(&fields, "first_name");
        let last_name = value(&fields, "last_name");
        let mobile = value(&fields, "mobile");
        let email = value(&fields, "email");
        if !validate_name(first_name) {
            return Ok("❌ Please enter a valid first name.".to_string());
        }
        if !validate_name(last_name) {
            return Ok("❌ Please enter a valid last name.".to_string());
        }
        if !validate_mobile(mobile) {
            return Ok("❌ Please enter a valid 10-digit mobile number.".to_string());
        }
        if !validate_email(email) {
            return Ok("❌ Please enter a valid email address.".to_string());
        }

        let customer = Customer::new(
            first_name,
            last_name,
            mobile,
            email,
            value(&fields, "password"),
        );
        if let Err(e) = self.services.auth.register(&customer).await {
            tracing::warn!(error = %e.detail_or_message(), "Registration failed");
            return Ok(format!("❌ Registration failed: {}", e.message));
        }
        let login = match self.services.auth.auto_login(&customer).await {
            Ok(login) => login,
            Err(e) => {
                tracing::warn!(error = %e.detail_or_message(), "Auto-login failed");
                return Ok(format!("❌ Auto-login failed: {}", e.message));
            }
        };

        self.session.transition_to(ConversationState::Authenticated)?;
        tracing::info!(customer_id = login.customer_id, "Customer authenticated");
        self.session.auth = Some(AuthSession {
            token: login.token,
            customer_id: login.customer_id,
            profile: login.profile,
        });
        Ok(prompts::registered(first_name))
    }

    async fn handle_menu(&mut self, message: &str) -> TurnResult {
        match match_menu_action(message) {
            Some(MenuAction::PlaceOrder) => self.start_order_placement().await,
            Some(MenuAction::UpdateOrder) => self.start_order_update().await,
            Some(MenuAction::ViewOrders) => self.show_orders().await,
            Some(MenuAction::Profile) => self.show_profile(),
            None => Ok(prompts::menu()),
        }
    }

    async fn start_order_placement(&mut self) -> TurnResult {
        let services = match self.services.orders.list_services().await {
            Ok(services) => services,
            Err(e) => {
                tracing::warn!(error = %e.detail_or_message(), "Service catalogue unavailable");
                return Ok(format!(
                    "❌ Unable to load services: {}\n\n{}",
                    e.message,
                    prompts::menu()
                ));
            }
        };
        if services.is_empty() {
            return Ok(format!("{}\n\n{}", prompts::NO_SERVICES, prompts::menu()));
        }

        let ids: Vec<String> = services.iter().filter_map(ServiceRecord::id).collect();
        if ids.is_empty() {
            return Ok(
                "❌ Unable to extract service IDs from the API response. Please contact support."
                    .to_string(),
            );
        }
        let listing = format_services_list(&services);

        self.session
            .transition_to(ConversationState::AwaitingServiceSelection)?;
        self.session.services = services;
        self.session.order = OrderDraft::default();
        Ok(prompts::choose_services(&listing, &ids))
    }

    fn handle_service_selection(&mut self, message: &str) -> TurnResult {
        let requested = parse_id_list(message);
        if requested.is_empty() {
            return Ok("❌ Please provide valid service IDs separated by commas.".to_string());
        }

        let mut available_ids = Vec::new();
        let mut by_id: HashMap<String, &ServiceRecord> = HashMap::new();
        for service in &self.session.services {
            if let Some(id) = service.id() {
                if by_id.insert(id.clone(), service).is_none() {
                    available_ids.push(id);
                }
            }
        }

        let invalid: Vec<String> = requested
            .iter()
            .filter(|id| !by_id.contains_key(*id))
            .cloned()
            .collect();
        if !invalid.is_empty() {
            return Ok(prompts::invalid_services(&invalid, &available_ids));
        }

        let selected: Vec<ServiceRecord> = requested
            .iter()
            .filter_map(|id| by_id.get(id).map(|s| (*s).clone()))
            .collect();
        let selected_text = format_selected_services(&selected);

        self.session
            .transition_to(ConversationState::AwaitingOrderDetails)?;
        self.session.order.services = Some(requested.join(","));
        self.session.order.sub_services = Some(self.config.default_sub_service.clone());
        Ok(prompts::order_details_form(&selected_text, &self.config.time_slots))
    }

    fn handle_order_details(&mut self, message: &str) -> TurnResult {
        let fields = parse_key_values(message);
        let missing = missing_keys(&fields, ORDER_DETAIL_FIELDS);
        if !missing.is_empty() {
            return Ok(prompts::missing_fields(&missing));
        }

        let pickup_date = value(&fields, "pickup_date");
        let drop_off_date = value(&fields, "drop-off_date");
        if !validate_date(pickup_date) {
            return Ok("❌ Invalid pickup date format. Please use YYYY-MM-DD.".to_string());
        }
        if !validate_date(drop_off_date) {
            return Ok("❌ Invalid drop-off date format. Please use YYYY-MM-DD.".to_string());
        }
        if !validate_future_date(pickup_date) {
            return Ok("❌ Pickup date must be in the future.".to_string());
        }
        if !validate_future_date(drop_off_date) {
            return Ok("❌ Drop-off date must be in the future.".to_string());
        }

        self.session
            .transition_to(ConversationState::AwaitingAddressDetails)?;
        let order = &mut self.session.order;
        order.pickup_date = Some(pickup_date.to_string());
        order.pickup_time = Some(value(&fields, "pickup_time").to_string());
        order.drop_off_date = Some(drop_off_date.to_string());
        order.drop_off_time = Some(value(&fields, "drop-off_time").to_string());
        order.collection_option = Some(value(&fields, "collection_option").to_string());
        order.delivery_option = Some(value(&fields, "delivery_option").to_string());
        Ok(prompts::ADDRESS_FORM.to_string())
    }

    async fn handle_address_details(&mut self, message: &str) -> TurnResult {
        let fields = parse_key_values(message);
        let missing = missing_keys(&fields, ADDRESS_FIELDS);
        if !missing.is_empty() {
            return Ok(prompts::missing_fields(&missing));
        }

        if !validate_name(value(&fields, "first_name")) {
            return Ok("❌ Please enter a valid first name.".to_string());
        }
        if !validate_name(value(&fields, "last_name")) {
            return Ok("❌ Please enter a valid last name.".to_string());
        }
        if !validate_email(value(&fields, "email")) {
            return Ok("❌ Please enter a valid email address.".to_string());
        }
        if !validate_mobile(value(&fields, "contact_number")) {
            return Ok("❌ Please enter a valid 10-digit contact number.".to_string());
        }
        if !validate_postcode(value(&fields, "postcode")) {
            return Ok("❌ Please enter a valid postcode.".to_string());
        }

        let auth = self.session.auth()?;
        let draft = &self.session.order;
        let request = OrderRequest {
            customer_id: auth.customer_id,
            pickup_date: draft_field(&draft.pickup_date, "pickup date")?,
            pickup_time: draft_field(&draft.pickup_time, "pickup time")?,
            drop_off_date: draft_field(&draft.drop_off_date, "drop-off date")?,
            drop_off_time: draft_field(&draft.drop_off_time, "drop-off time")?,
            services: draft_field(&draft.services, "selected services")?,
            sub_services: draft_field(&draft.sub_services, "sub-services")?,
            collection_option: draft_field(&draft.collection_option, "collection option")?,
            delivery_option: draft_field(&draft.delivery_option, "delivery option")?,
            order_address: OrderAddress {
                firstname: value(&fields, "first_name").to_string(),
                lastname: value(&fields, "last_name").to_string(),
                email: value(&fields, "email").to_string(),
                contact_no: value(&fields, "contact_number").to_string(),
                post_code: value(&fields, "postcode").to_string(),
                address_line1: value(&fields, "address_line_1").to_string(),
                address_line2: value(&fields, "address_line_2").to_string(),
            },
            offer_code: String::new(),
        };

        let created = match self.services.orders.create_order(&request, &auth.token).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(error = %e.detail_or_message(), "Order placement failed");
                return Ok(format!("❌ Order placement failed: {}", e.detail_or_message()));
            }
        };
        let summary = format_order_summary(&request, &auth.profile);

        self.session.transition_to(ConversationState::Authenticated)?;
        self.session.order = OrderDraft::default();
        Ok(prompts::order_placed(&created.message, &summary))
    }

    async fn start_order_update(&mut self) -> TurnResult {
        let auth = self.session.auth()?;
        let orders = match self
            .services
            .orders
            .get_order_detail(auth.customer_id, &auth.token)
            .await
        {
            Ok(orders) => orders,
            Err(e) => return Ok(format!("❌ Unable to load orders: {}", e.message)),
        };
        if orders.is_empty() {
            return Ok(prompts::NO_ORDERS_TO_UPDATE.to_string());
        }
        let listing = format_order_list(&orders);

        self.session
            .transition_to(ConversationState::AwaitingUpdateSelection)?;
        self.session.current_orders = orders;
        self.session.pending_update = None;
        self.session.update_field = None;
        Ok(prompts::choose_order_to_update(&listing))
    }

    fn handle_update_selection(&mut self, message: &str) -> TurnResult {
        let index = match parse_selection_index(message, self.session.current_orders.len()) {
            Ok(index) => index,
            Err(SelectionError::NotANumber) => {
                return Ok("❌ Please enter a valid order number.".to_string());
            }
            Err(SelectionError::OutOfRange { max }) => {
                return Ok(prompts::invalid_order_number(max));
            }
        };

        let order = self
            .session
            .current_orders
            .get(index)
            .cloned()
            .ok_or(TurnError::MissingSessionData("selected order"))?;
        if let Err(e) = check_updatable(&order) {
            return Ok(format!("❌ {}\n\nPlease select a different order.", e.message));
        }

        self.session
            .transition_to(ConversationState::AwaitingUpdateValue)?;
        tracing::debug!(order_id = ?order.id(), "Order selected for update");
        self.session.pending_update = Some(order);
        Ok(prompts::choose_update_field())
    }

    fn handle_update_value(&mut self, message: &str) -> TurnResult {
        let Some(field) = match_update_field(message) else {
            return Ok(prompts::update_field_retry());
        };

        let label = field.label();
        let prompt = match field.kind() {
            FieldKind::Date => prompts::enter_date(label),
            FieldKind::TimeSlot => prompts::enter_time_slot(label, &self.config.time_slots),
            FieldKind::Collection => {
                prompts::enter_option(label, &self.config.collection_options)
            }
            FieldKind::Delivery => prompts::enter_option(label, &self.config.delivery_options),
        };

        self.session
            .transition_to(ConversationState::AwaitingUpdateInput)?;
        self.session.update_field = Some(field);
        Ok(prompt)
    }

    async fn handle_update_input(&mut self, message: &str) -> TurnResult {
        let field = self
            .session
            .update_field
            .ok_or(TurnError::MissingSessionData("field being updated"))?;
        let new_value = match self.checked_update_value(field, message.trim()) {
            Ok(v) => v,
            Err(reply) => return Ok(reply),
        };

        let order = self
            .session
            .pending_update
            .as_ref()
            .ok_or(TurnError::MissingSessionData("order being updated"))?;
        let auth = self.session.auth()?;

        let Some(order_id) = order.numeric_id() else {
            tracing::warn!(order = %order.0, "Selected order has no usable id");
            self.session.transition_to(ConversationState::Authenticated)?;
            self.session.pending_update = None;
            self.session.update_field = None;
            return Ok(format!("{}\n\n{}", prompts::MISSING_ORDER_ID, prompts::menu()));
        };

        let mut request = order.to_update_request(order_id, auth.customer_id);
        apply_update(&mut request, field, new_value);

        let updated = match self.services.orders.update_order(&request, &auth.token).await {
            Ok(updated) => updated,
            Err(e) => return Ok(prompts::update_failed(e.detail_or_message())),
        };

        self.session.transition_to(ConversationState::Authenticated)?;
        tracing::info!(
            order_id,
            field = %field,
            endpoint = %updated.endpoint_used,
            "Order updated"
        );
        self.session.update_field = None;
        self.session.pending_update = None;
        Ok(prompts::order_updated(&updated.message))
    }

    /// Validate a new field value, returning the value to send or the reply
    /// explaining the rejection.
    fn checked_update_value(&self, field: UpdateField, input: &str) -> Result<String, String> {
        match field.kind() {
            FieldKind::Date => {
                if !validate_date(input) {
                    return Err("❌ Invalid date format. Please use YYYY-MM-DD.".to_string());
                }
                if !validate_future_date(input) {
                    return Err("❌ Date must be in the future.".to_string());
                }
                Ok(input.to_string())
            }
            FieldKind::TimeSlot => {
                if self.config.time_slots.iter().any(|slot| slot == input) {
                    Ok(input.to_string())
                } else {
                    Err(format!(
                        "❌ Invalid time slot. Please choose from: {}",
                        self.config.time_slots.join(", ")
                    ))
                }
            }
            FieldKind::Collection => {
                canonical_option(&self.config.collection_options, input).ok_or_else(|| {
                    format!(
                        "❌ Invalid collection option. Please choose from: {}",
                        self.config.collection_options.join(", ")
                    )
                })
            }
            FieldKind::Delivery => {
                canonical_option(&self.config.delivery_options, input).ok_or_else(|| {
                    format!(
                        "❌ Invalid delivery option. Please choose from: {}",
                        self.config.delivery_options.join(", ")
                    )
                })
            }
        }
    }

    async fn show_orders(&mut self) -> TurnResult {
        let auth = self.session.auth()?;
        let orders = match self
            .services
            .orders
            .get_order_detail(auth.customer_id, &auth.token)
            .await
        {
            Ok(orders) => orders,
            Err(e) => return Ok(format!("❌ Unable to load orders: {}", e.message)),
        };
        if orders.is_empty() {
            return Ok(prompts::NO_ORDERS_YET.to_string());
        }

        let reply = prompts::orders_overview(&format_order_list(&orders));
        self.session.current_orders = orders;
        Ok(reply)
    }

    fn show_profile(&self) -> TurnResult {
        let auth = self.session.auth()?;
        Ok(prompts::profile(&format_customer_info(&auth.profile)))
    }
}

/// Value of a key already known to be present.
fn value<'a>(fields: &'a HashMap<String, String>, key: &str) -> &'a str {
    fields.get(key).map(String::as_str).unwrap_or_default()
}

fn draft_field(field: &Option<String>, name: &'static str) -> Result<String, TurnError> {
    field.clone().ok_or(TurnError::MissingSessionData(name))
}

/// Canonical spelling of `input` among `options`, ignoring case.
fn canonical_option(options: &[String], input: &str) -> Option<String> {
    let input = input.to_lowercase();
    options.iter().find(|o| o.to_lowercase() == input).cloned()
}

fn apply_update(request: &mut OrderUpdateRequest, field: UpdateField, new_value: String) {
    match field {
        UpdateField::PickupDate => request.pickup_date = new_value,
        UpdateField::PickupTime => request.pickup_time = new_value,
        UpdateField::DropOffDate => request.drop_off_date = new_value,
        UpdateField::DropOffTime => request.drop_off_time = new_value,
        UpdateField::CollectionOption => request.collection_option = new_value,
        UpdateField::DeliveryOption => request.delivery_option = new_value,
    }
}
