pub mod gateway;
pub mod razorpay;

pub use gateway::{PaymentError, PaymentGateway, PaymentOrder};
pub use razorpay::RazorpayClient;
