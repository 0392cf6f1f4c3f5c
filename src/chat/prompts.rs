//! Fixed bot replies and prompt builders.

pub const WELCOME: &str = "🧺 Welcome to our Laundry Service Chatbot!

I can help you with:
• Register as a new customer
• Place laundry orders
• Update existing orders
• View order summaries

To get started, I'll need to check if we serve your area. Please provide your postcode:";

pub const SOMETHING_WENT_WRONG: &str =
    "I'm sorry, something went wrong. Let's start over. Please type 'start' to begin.";

const MAIN_MENU: &str = "1️⃣ **Place Order** - Create a new laundry order
2️⃣ **Update Order** - Modify an existing order
3️⃣ **View Orders** - See your order history
4️⃣ **Profile** - View your profile information";

const UPDATE_FIELDS: &str = "1️⃣ **Pickup Date**
2️⃣ **Pickup Time**
3️⃣ **Drop-off Date**
4️⃣ **Drop-off Time**
5️⃣ **Collection Option**
6️⃣ **Delivery Option**";

const REGISTRATION_FORM: &str = "Now, let's register you as a customer. Please provide your details in the following format:

**First Name:** Your first name
**Last Name:** Your last name
**Mobile:** Your 10-digit mobile number
**Email:** Your email address
**Password:** A strong password

Example:
First Name: John
Last Name: Doe
Mobile: 1234567890
Email: john@example.com
Password: MySecure123!";

pub const ADDRESS_FORM: &str = "✅ Order details saved!

Now, please provide the delivery address details:

**First Name:** Recipient's first name
**Last Name:** Recipient's last name
**Email:** Recipient's email
**Contact Number:** 10-digit contact number
**Address Line 1:** Street address
**Address Line 2:** Apartment, suite, etc. (optional)
**Postcode:** Delivery postcode

Example:
First Name: Jane
Last Name: Smith
Email: jane@example.com
Contact Number: 9876543210
Address Line 1: 123 Main Street
Address Line 2: Apt 4B
Postcode: BR20XZ";

pub const NO_ORDERS_TO_UPDATE: &str = "❌ No orders found. Please place an order first.";

pub const NO_ORDERS_YET: &str = "No orders found. 📭

Would you like to place your first order?

1️⃣ **Place Order** - Create a new laundry order
4️⃣ **Profile** - View your profile information

Type the number or name of the option.";

pub const NO_SERVICES: &str = "❌ No services available at the moment. Please try again later.";

pub const MISSING_ORDER_ID: &str =
    "❌ Unable to identify order ID. Please try selecting the order again.";

pub fn registration_form(serviceable_message: &str) -> String {
    format!("✅ {serviceable_message}\n\n{REGISTRATION_FORM}")
}

pub fn not_serviceable(message: &str) -> String {
    format!("❌ {message}\n\nPlease try with a different postcode or contact us for more information.")
}

pub fn registered(first_name: &str) -> String {
    format!(
        "✅ Registration successful! Welcome {first_name}!\n\n\
         You are now logged in. Here's what you can do:\n\n\
         {MAIN_MENU}\n\n\
         Please type the number or name of the option you'd like to choose."
    )
}

pub fn menu() -> String {
    format!(
        "Please choose one of the following options:\n\n{MAIN_MENU}\n\n\
         Type the number or name of the option."
    )
}

/// Main menu appended after a completed action.
pub fn what_next() -> String {
    format!("What would you like to do next?\n\n{MAIN_MENU}")
}

pub fn missing_fields(missing: &[&str]) -> String {
    format!("❌ Missing required fields: {}", missing.join(", "))
}

pub fn choose_services(services_text: &str, ids: &[String]) -> String {
    let example = ids.iter().take(2).cloned().collect::<Vec<_>>().join(",");
    format!(
        "🧺 Let's place your order!\n\n{services_text}\
         Please select the services you want by typing the service IDs (comma-separated).\n\n\
         Available service IDs: {}\n\n\
         For example: {example}",
        ids.join(", ")
    )
}

pub fn invalid_services(invalid: &[String], available: &[String]) -> String {
    format!(
        "❌ Invalid service IDs: {}\n\nAvailable service IDs: {}\n\n\
         Please select from the available services.",
        invalid.join(", "),
        available.join(", ")
    )
}

pub fn order_details_form(selected_text: &str, time_slots: &[String]) -> String {
    format!(
        "✅ Services selected successfully!\n\n{selected_text}\
         Now, please provide your order details:\n\n\
         **Pickup Date:** YYYY-MM-DD\n\
         **Pickup Time:** (choose from available slots)\n\
         **Drop-off Date:** YYYY-MM-DD\n\
         **Drop-off Time:** (choose from available slots)\n\
         **Collection Option:** Driver collects from you / Drop off at store\n\
         **Delivery Option:** Driver delivers to you / Collect from store\n\n\
         Available time slots:\n{}\n\n\
         Example:\n\
         Pickup Date: 2025-07-19\n\
         Pickup Time: 09:00 AM - 11:00 AM\n\
         Drop-off Date: 2025-07-21\n\
         Drop-off Time: 03:00 PM - 05:00 PM\n\
         Collection Option: Driver collects from you\n\
         Delivery Option: Driver delivers to you",
        bullets(time_slots)
    )
}

pub fn order_placed(message: &str, summary: &str) -> String {
    format!("✅ {message}\n\n{summary}\n{}", what_next())
}

pub fn choose_order_to_update(orders_text: &str) -> String {
    format!("{orders_text}Please select which order you want to update (enter the order number):")
}

pub fn invalid_order_number(max: usize) -> String {
    format!("❌ Invalid order number. Please select between 1 and {max}.")
}

pub fn choose_update_field() -> String {
    format!(
        "✅ Order selected for update!\n\nWhat would you like to update?\n\n{UPDATE_FIELDS}\n\n\
         Please type the number or name of what you want to update:"
    )
}

pub fn update_field_retry() -> String {
    format!(
        "Please select what you want to update:\n\n{UPDATE_FIELDS}\n\n\
         Type the number or name of what you want to update:"
    )
}

pub fn enter_date(label: &str) -> String {
    format!(
        "Please enter the new {label} in YYYY-MM-DD format:\n\n\
         Example: 2025-07-22\n\n\
         Note: The date must be in the future."
    )
}

pub fn enter_time_slot(label: &str, time_slots: &[String]) -> String {
    format!(
        "Please select the new {label} from the available slots:\n\n{}\n\n\
         Type the exact time slot you want:",
        bullets(time_slots)
    )
}

pub fn enter_option(label: &str, options: &[String]) -> String {
    format!(
        "Please select the new {label}:\n\n{}\n\nType the exact option you want:",
        bullets(options)
    )
}

pub fn update_failed(detail: &str) -> String {
    format!(
        "❌ Update failed: {detail}\n\n\
         Please try again or contact support if the issue persists."
    )
}

pub fn order_updated(message: &str) -> String {
    format!(
        "✅ {message}\n\nYour order has been updated successfully!\n\n{}",
        what_next()
    )
}

pub fn orders_overview(orders_text: &str) -> String {
    format!("{orders_text}{}", what_next())
}

pub fn profile(profile_text: &str) -> String {
    format!(
        "{profile_text}\n{}\n\nType the number or name of the option.",
        what_next()
    )
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_services_examples_first_two_ids() {
        let ids = vec!["4".to_string(), "7".to_string(), "9".to_string()];
        let text = choose_services("LIST\n\n", &ids);
        assert!(text.contains("Available service IDs: 4, 7, 9"));
        assert!(text.ends_with("For example: 4,7"));

        let text = choose_services("", &ids[..1]);
        assert!(text.ends_with("For example: 4"));
    }

    #[test]
    fn time_slots_are_bulleted() {
        let slots = vec!["09:00 AM - 11:00 AM".to_string(), "11:00 AM - 01:00 PM".to_string()];
        let text = enter_time_slot("pickup time", &slots);
        assert!(text.contains("• 09:00 AM - 11:00 AM\n• 11:00 AM - 01:00 PM"));
    }

    #[test]
    fn menu_lists_every_option() {
        let text = menu();
        for option in ["Place Order", "Update Order", "View Orders", "Profile"] {
            assert!(text.contains(option));
        }
    }
}
