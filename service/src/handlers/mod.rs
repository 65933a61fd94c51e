pub mod fx_quote;
pub mod legal_entity;
pub mod response;
pub mod tenant;
pub mod transfer;
pub mod wallet;
