//! Browser console logging. Messages are dropped on native targets.

#[cfg(target_arch = "wasm32")]
const PREFIX: &str = "10C Miner: ";

#[cfg(target_arch = "wasm32")]
pub fn log(msg: &str) {
    web_sys::console::log_1(&format!("{PREFIX}{msg}").into());
}

#[cfg(target_arch = "wasm32")]
pub fn warn(msg: &str) {
    web_sys::console::warn_1(&format!("{PREFIX}{msg}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(_msg: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(_msg: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_logging_is_silent() {
        log("save restored");
        warn("failed to write save: QuotaExceededError");
    }
}
