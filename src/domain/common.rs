/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Entities carrying an amount in currency minor units.
pub trait Amounted {
    fn amount_minor(&self) -> i64;
}
