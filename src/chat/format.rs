//! Rendering of backend records into chat text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::models::{CustomerProfile, OrderRecord, OrderRequest, ServiceRecord};

pub fn format_services_list(services: &[ServiceRecord]) -> String {
    if services.is_empty() {
        return "No services available".to_string();
    }

    let mut out = String::from("📋 **Available Services:**\n\n");
    for service in services {
        out.push_str(&format!(
            "**ID: {}** - {}\n",
            service.id().unwrap_or_default(),
            service.name().unwrap_or_else(|| "Unknown Service".to_string())
        ));
        if let Some(desc) = service.description() {
            out.push_str(&format!("   📝 {desc}\n"));
        }
        if let Some(price) = service.price() {
            out.push_str(&format!("   💰 Price: ${price}\n"));
        }
        out.push('\n');
    }
    out
}

/// The chosen services, with an estimated total when every price is known.
pub fn format_selected_services(services: &[ServiceRecord]) -> String {
    if services.is_empty() {
        return "No services selected".to_string();
    }

    let mut out = String::from("🧺 **Selected Services:**\n\n");
    let mut total = Some(Decimal::ZERO);
    for (i, service) in services.iter().enumerate() {
        out.push_str(&format!(
            "{}. **{}** (ID: {})\n",
            i + 1,
            service.name().unwrap_or_else(|| "Unknown Service".to_string()),
            service.id().unwrap_or_default()
        ));
        if let Some(desc) = service.description() {
            out.push_str(&format!("   📝 {desc}\n"));
        }
        match (service.price_decimal(), service.price()) {
            (Some(price), _) => {
                out.push_str(&format!("   💰 Price: ${:.2}\n", price.round_dp(2)));
                total = total.map(|t| t + price);
            }
            (None, Some(raw)) => {
                out.push_str(&format!("   💰 Price: {raw}\n"));
                total = None;
            }
            (None, None) => total = None,
        }
        out.push('\n');
    }

    if let Some(total) = total.filter(|t| *t > Decimal::ZERO) {
        out.push_str(&format!(
            "**Total Estimated Price: ${:.2}**\n\n",
            total.round_dp(2)
        ));
    }
    out
}

/// Summary shown after an order has been placed.
pub fn format_order_summary(order: &OrderRequest, customer: &CustomerProfile) -> String {
    let mut out = String::from("📋 **Order Summary**\n\n");

    out.push_str(&format!(
        "👤 **Customer:** {} {}\n",
        customer.firstname, customer.lastname
    ));
    out.push_str(&format!("📧 **Email:** {}\n", customer.email));
    out.push_str(&format!("📱 **Mobile:** {}\n\n", customer.mobile_no));

    out.push_str(&format!("📅 **Pickup Date:** {}\n", order.pickup_date));
    out.push_str(&format!("🕒 **Pickup Time:** {}\n", order.pickup_time));
    out.push_str(&format!("📅 **Drop-off Date:** {}\n", order.drop_off_date));
    out.push_str(&format!("🕒 **Drop-off Time:** {}\n\n", order.drop_off_time));

    out.push_str(&format!("🚚 **Collection:** {}\n", order.collection_option));
    out.push_str(&format!("🏠 **Delivery:** {}\n\n", order.delivery_option));

    let addr = &order.order_address;
    out.push_str("📍 **Address:**\n");
    out.push_str(&format!("   {} {}\n", addr.firstname, addr.lastname));
    out.push_str(&format!("   {}\n", addr.address_line1));
    if !addr.address_line2.is_empty() {
        out.push_str(&format!("   {}\n", addr.address_line2));
    }
    out.push_str(&format!("   {}\n", addr.post_code));
    out.push_str(&format!("   📞 {}\n\n", addr.contact_no));

    if !order.services.is_empty() {
        out.push_str(&format!("🧺 **Services:** {}\n", order.services));
    }
    if !order.sub_services.is_empty() {
        out.push_str(&format!("🔧 **Sub-services:** {}\n", order.sub_services));
    }
    out
}

/// Numbered order list; the numbers are what the update flow asks for.
pub fn format_order_list(orders: &[OrderRecord]) -> String {
    if orders.is_empty() {
        return "No orders found".to_string();
    }

    let mut out = String::from("📋 **Your Orders:**\n\n");
    for (i, order) in orders.iter().enumerate() {
        out.push_str(&format!("**Order #{}**\n", i + 1));
        out.push_str(&format!(
            "📅 Pickup: {} at {}\n",
            order.pickup_date(),
            order.pickup_time()
        ));
        out.push_str(&format!(
            "📅 Drop-off: {} at {}\n",
            order.drop_off_date(),
            order.drop_off_time()
        ));
        out.push_str(&format!(
            "📊 Status: {}\n",
            order.status().unwrap_or_else(|| "Pending".to_string())
        ));
        if let Some(amount) = order.total_amount() {
            out.push_str(&format!("💰 Amount: ${amount}\n"));
        }
        if let Some(created) = order.created_at() {
            out.push_str(&format!("🗓️ Placed: {}\n", format_datetime_for_display(&created)));
        }
        out.push('\n');
    }
    out
}

pub fn format_customer_info(customer: &CustomerProfile) -> String {
    let mut out = String::from("👤 **Customer Information:**\n\n");
    out.push_str(&format!(
        "**Name:** {} {}\n",
        customer.firstname, customer.lastname
    ));
    out.push_str(&format!("**Email:** {}\n", customer.email));
    out.push_str(&format!("**Mobile:** {}\n", customer.mobile_no));
    out.push_str(&format!("**Total Orders:** {}\n", customer.total_order));
    out
}

pub fn format_error_message(error: &str) -> String {
    format!("❌ **Error:** {error}")
}

pub fn format_success_message(message: &str) -> String {
    format!("✅ **Success:** {message}")
}

/// Render an ISO timestamp as `July 19, 2025 at 09:00 AM`.
///
/// Anything that does not parse is returned unchanged.
pub fn format_datetime_for_display(raw: &str) -> String {
    const DISPLAY: &str = "%B %d, %Y at %I:%M %p";
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format(DISPLAY).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return dt.format(DISPLAY).to_string();
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return dt.format(DISPLAY).to_string();
    }
    raw.to_string()
}
