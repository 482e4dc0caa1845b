//! Callbacks module for handling all inline keyboard callback queries
//!
//! - `callback_handler`: Routes a button press to the session action
//! - `callback_types`: Encoding and decoding of callback data

pub mod callback_handler;
pub mod callback_types;
