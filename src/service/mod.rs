//! Validator Service Module
//! 
//! Business logic on top of the validator registry.
//! Every method is a pass-through to the repository except `check_duplicate`,
//! which turns a successful lookup into a `Duplicate` error.

mod validator_service;


pub use validator_service::ValidatorService;
