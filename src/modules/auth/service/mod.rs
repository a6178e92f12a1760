pub mod otp;
pub mod ownership;
pub mod token;
