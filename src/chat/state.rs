//! Conversation state machine: which step of which flow the user is in,
//! and everything collected along the way.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::menu::UpdateField;
use crate::error::TurnError;
use crate::models::{CustomerProfile, OrderRecord, ServiceRecord};

/// The steps of a conversation.
///
/// Start → AwaitingPostcode → AwaitingCustomerDetails → Authenticated, then
/// either the placement flow (AwaitingServiceSelection → AwaitingOrderDetails →
/// AwaitingAddressDetails) or the update flow (AwaitingUpdateSelection →
/// AwaitingUpdateValue → AwaitingUpdateInput), both returning to Authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Start,
    AwaitingPostcode,
    AwaitingCustomerDetails,
    Authenticated,
    AwaitingServiceSelection,
    AwaitingOrderDetails,
    AwaitingAddressDetails,
    AwaitingUpdateSelection,
    AwaitingUpdateValue,
    AwaitingUpdateInput,
}

impl ConversationState {
    /// Check if a transition from `self` to `target` is valid.
    ///
    /// Resets are not transitions; they bypass this check.
    pub fn can_transition_to(&self, target: ConversationState) -> bool {
        use ConversationState::*;
        matches!(
            (self, target),
            (Start, AwaitingPostcode)
                | (AwaitingPostcode, AwaitingCustomerDetails)
                | (AwaitingCustomerDetails, Authenticated)
                | (Authenticated, AwaitingServiceSelection)
                | (Authenticated, AwaitingUpdateSelection)
                | (AwaitingServiceSelection, AwaitingOrderDetails)
                | (AwaitingOrderDetails, AwaitingAddressDetails)
                | (AwaitingAddressDetails, Authenticated)
                | (AwaitingUpdateSelection, AwaitingUpdateValue)
                | (AwaitingUpdateValue, AwaitingUpdateInput)
                | (AwaitingUpdateInput, Authenticated)
        )
    }

    /// Whether the state requires a logged-in customer.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Start | Self::AwaitingPostcode | Self::AwaitingCustomerDetails
        )
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::AwaitingPostcode => "awaiting_postcode",
            Self::AwaitingCustomerDetails => "awaiting_customer_details",
            Self::Authenticated => "authenticated",
            Self::AwaitingServiceSelection => "awaiting_service_selection",
            Self::AwaitingOrderDetails => "awaiting_order_details",
            Self::AwaitingAddressDetails => "awaiting_address_details",
            Self::AwaitingUpdateSelection => "awaiting_update_selection",
            Self::AwaitingUpdateValue => "awaiting_update_value",
            Self::AwaitingUpdateInput => "awaiting_update_input",
        };
        write!(f, "{s}")
    }
}

/// Credentials and profile of a logged-in customer.
///
/// Token and customer id live together so one is never set without the other.
#[derive(Debug)]
pub struct AuthSession {
    pub token: SecretString,
    pub customer_id: i64,
    pub profile: CustomerProfile,
}

/// Order fields collected across the placement flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    /// Comma-joined service ids.
    pub services: Option<String>,
    pub sub_services: Option<String>,
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub drop_off_date: Option<String>,
    pub drop_off_time: Option<String>,
    pub collection_option: Option<String>,
    pub delivery_option: Option<String>,
}

/// Everything known about one conversation. Owned by a single `Chatbot`.
#[derive(Debug, Default)]
pub struct Session {
    pub state: ConversationState,
    /// Postcode confirmed as serviceable, before registration.
    pub postcode: Option<String>,
    pub auth: Option<AuthSession>,
    pub order: OrderDraft,
    /// Catalogue fetched when the current placement flow started.
    pub services: Vec<ServiceRecord>,
    /// Order chosen for modification.
    pub pending_update: Option<OrderRecord>,
    /// Field being edited; only meaningful in `AwaitingUpdateInput`.
    pub update_field: Option<UpdateField>,
    /// Orders fetched when the update flow started.
    pub current_orders: Vec<OrderRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every field and go back to `Start`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn auth(&self) -> Result<&AuthSession, TurnError> {
        self.auth.as_ref().ok_or(TurnError::NotAuthenticated)
    }

    /// Move to `next`, refusing transitions the flow does not allow.
    pub fn transition_to(&mut self, next: ConversationState) -> Result<(), TurnError> {
        if !self.state.can_transition_to(next) {
            return Err(TurnError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(from = %self.state, to = %next, "State transition");
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use ConversationState::*;
        let transitions = [
            (Start, AwaitingPostcode),
            (AwaitingPostcode, AwaitingCustomerDetails),
            (AwaitingCustomerDetails, Authenticated),
            (Authenticated, AwaitingServiceSelection),
            (AwaitingServiceSelection, AwaitingOrderDetails),
            (AwaitingOrderDetails, AwaitingAddressDetails),
            (AwaitingAddressDetails, Authenticated),
            (Authenticated, AwaitingUpdateSelection),
            (AwaitingUpdateSelection, AwaitingUpdateValue),
            (AwaitingUpdateValue, AwaitingUpdateInput),
            (AwaitingUpdateInput, Authenticated),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use ConversationState::*;
        assert!(!Start.can_transition_to(Authenticated));
        assert!(!AwaitingPostcode.can_transition_to(AwaitingServiceSelection));
        assert!(!AwaitingServiceSelection.can_transition_to(AwaitingUpdateValue));
        assert!(!Authenticated.can_transition_to(Authenticated));
        assert!(!AwaitingUpdateInput.can_transition_to(AwaitingUpdateValue));
    }

    #[test]
    fn display_matches_serde() {
        use ConversationState::*;
        let states = [
            Start,
            AwaitingPostcode,
            AwaitingCustomerDetails,
            Authenticated,
            AwaitingServiceSelection,
            AwaitingOrderDetails,
            AwaitingAddressDetails,
            AwaitingUpdateSelection,
            AwaitingUpdateValue,
            AwaitingUpdateInput,
        ];
        for state in states {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(format!("\"{state}\""), json, "Display and serde should match for {state:?}");
        }
    }

    #[test]
    fn requires_auth_only_after_login() {
        assert!(!ConversationState::AwaitingCustomerDetails.requires_auth());
        assert!(ConversationState::Authenticated.requires_auth());
        assert!(ConversationState::AwaitingUpdateInput.requires_auth());
    }

    #[test]
    fn transition_rejects_skips() {
        let mut session = Session::new();
        assert!(session.transition_to(ConversationState::Authenticated).is_err());
        assert_eq!(session.state, ConversationState::Start);
        session.transition_to(ConversationState::AwaitingPostcode).unwrap();
        assert_eq!(session.state, ConversationState::AwaitingPostcode);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = Session::new();
        session.state = ConversationState::Authenticated;
        session.postcode = Some("SW1A1AA".into());
        session.auth = Some(AuthSession {
            token: SecretString::from("t"),
            customer_id: 1,
            profile: CustomerProfile::default(),
        });
        session.update_field = Some(UpdateField::PickupDate);
        session.order.services = Some("1".into());

        session.reset();
        assert_eq!(session.state, ConversationState::Start);
        assert!(session.postcode.is_none());
        assert!(!session.is_authenticated());
        assert!(session.update_field.is_none());
        assert_eq!(session.order, OrderDraft::default());
    }
}
