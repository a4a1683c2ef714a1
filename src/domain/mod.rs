//! Domain layer: merchant-code validation, merchant and recipient records,
//! scan events, the transaction draft, and the ports every external
//! collaborator is consumed through.

pub mod code;
pub mod draft;
pub mod merchant;
pub mod ports;
pub mod scan;
