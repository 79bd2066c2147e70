//! Dialogue kernel: one recognized intent in, one session outcome out.
//!
//! # KERNEL LAW
//! Nothing in here holds state between turns. Everything a conversation needs
//! to remember travels inside the carried payload of the intent message.

pub mod division;
pub mod event;
pub mod multiplication;
pub mod outcome;
pub mod payload;

/// Intent the division dialogue is subscribed to (and restricts reprompts to).
pub const DIVISION_INTENT: &str = "dadrus:Div";
pub const MULTIPLICATION_INTENT: &str = "dadrus:Mul";
