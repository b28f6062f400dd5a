use serde::Serialize;

/// Kind of value an input field carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Whole currency units; blank means zero
    Amount,
    /// true/false; blank means false
    Flag,
    Text,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Amount => "amount",
            FieldKind::Flag => "flag",
            FieldKind::Text => "text",
        }
    }
}

/// Description of one input column, generated by `#[derive(InputSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub description: &'static str,
}
