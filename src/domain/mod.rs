//! Pure booking rules shared by every service that shows or stores a price,
//! a selectable room type, a wizard stage or a status label.

pub mod availability;
pub mod booking_flow;
pub mod labels;
pub mod pricing;
