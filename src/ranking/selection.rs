//! Driver selection target

/// Route of the payment step once a driver is picked
const PAYMENT_ROUTE: &str = "/pick-and-order/payment";

/// Path of the payment step carrying the selected driver
pub fn payment_path(driver_id: &str) -> String {
    format!("{}?driverId={}", PAYMENT_ROUTE, urlencoding::encode(driver_id))
}
