//! Keyword tables for menu dispatch.
//!
//! Inputs are matched after trimming and lower-casing. Adding a synonym means
//! adding a string to a table, never a new branch.

/// Actions offered by the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    PlaceOrder,
    UpdateOrder,
    ViewOrders,
    Profile,
}

pub const MENU_OPTIONS: &[(&[&str], MenuAction)] = &[
    (&["1", "place order", "place", "order"], MenuAction::PlaceOrder),
    (&["2", "update order", "update"], MenuAction::UpdateOrder),
    (&["3", "view orders", "view", "orders"], MenuAction::ViewOrders),
    (&["4", "profile", "info"], MenuAction::Profile),
];

/// An editable field of an existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateField {
    PickupDate,
    PickupTime,
    DropOffDate,
    DropOffTime,
    CollectionOption,
    DeliveryOption,
}

/// How a new value for an [`UpdateField`] is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    TimeSlot,
    Collection,
    Delivery,
}

impl UpdateField {
    /// Human label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PickupDate => "pickup date",
            Self::PickupTime => "pickup time",
            Self::DropOffDate => "drop-off date",
            Self::DropOffTime => "drop-off time",
            Self::CollectionOption => "collection option",
            Self::DeliveryOption => "delivery option",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::PickupDate | Self::DropOffDate => FieldKind::Date,
            Self::PickupTime | Self::DropOffTime => FieldKind::TimeSlot,
            Self::CollectionOption => FieldKind::Collection,
            Self::DeliveryOption => FieldKind::Delivery,
        }
    }
}

impl std::fmt::Display for UpdateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub const UPDATE_FIELD_OPTIONS: &[(&[&str], UpdateField)] = &[
    (&["1", "pickup date"], UpdateField::PickupDate),
    (&["2", "pickup time"], UpdateField::PickupTime),
    (&["3", "drop-off date", "dropoff date"], UpdateField::DropOffDate),
    (&["4", "drop-off time", "dropoff time"], UpdateField::DropOffTime),
    (&["5", "collection option", "collection"], UpdateField::CollectionOption),
    (&["6", "delivery option", "delivery"], UpdateField::DeliveryOption),
];

pub const RESTART_KEYWORDS: &[&str] = &["start", "restart", "reset"];

fn lookup<T: Copy>(table: &[(&[&str], T)], input: &str) -> Option<T> {
    let normalized = input.trim().to_lowercase();
    table
        .iter()
        .find(|(keys, _)| keys.contains(&normalized.as_str()))
        .map(|(_, value)| *value)
}

pub fn match_menu_action(input: &str) -> Option<MenuAction> {
    lookup(MENU_OPTIONS, input)
}

pub fn match_update_field(input: &str) -> Option<UpdateField> {
    lookup(UPDATE_FIELD_OPTIONS, input)
}

pub fn is_restart_command(input: &str) -> bool {
    RESTART_KEYWORDS.contains(&input.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_synonyms() {
        assert_eq!(match_menu_action("1"), Some(MenuAction::PlaceOrder));
        assert_eq!(match_menu_action("  Place Order "), Some(MenuAction::PlaceOrder));
        assert_eq!(match_menu_action("UPDATE"), Some(MenuAction::UpdateOrder));
        assert_eq!(match_menu_action("orders"), Some(MenuAction::ViewOrders));
        assert_eq!(match_menu_action("info"), Some(MenuAction::Profile));
        assert_eq!(match_menu_action("5"), None);
        assert_eq!(match_menu_action("place an order"), None);
    }

    #[test]
    fn update_field_synonyms() {
        assert_eq!(match_update_field("1"), Some(UpdateField::PickupDate));
        assert_eq!(match_update_field("Dropoff Date"), Some(UpdateField::DropOffDate));
        assert_eq!(match_update_field("drop-off time"), Some(UpdateField::DropOffTime));
        assert_eq!(match_update_field("collection"), Some(UpdateField::CollectionOption));
        assert_eq!(match_update_field("6"), Some(UpdateField::DeliveryOption));
        assert_eq!(match_update_field("7"), None);
    }

    #[test]
    fn field_kinds() {
        assert_eq!(UpdateField::PickupDate.kind(), FieldKind::Date);
        assert_eq!(UpdateField::DropOffTime.kind(), FieldKind::TimeSlot);
        assert_eq!(UpdateField::DeliveryOption.kind(), FieldKind::Delivery);
        assert_eq!(UpdateField::DropOffDate.to_string(), "drop-off date");
    }

    #[test]
    fn restart_keywords() {
        assert!(is_restart_command("start"));
        assert!(is_restart_command("  RESTART "));
        assert!(is_restart_command("Reset"));
        assert!(!is_restart_command("restart please"));
        assert!(!is_restart_command(""));
    }
}
