//! Test assertions for responses.

use std::fmt::Debug;

use crate::config::ResponseCodes;
use crate::core::Response;

/// Asserts that the response carries the success code and message.
pub fn assert_response_success<D: Debug>(response: &Response<D>, codes: &ResponseCodes) {
    assert!(
        response.code() == codes.success_code && response.message() == codes.success_message,
        "Expected success [{}] {}, got [{}] {}",
        codes.success_code,
        codes.success_message,
        response.code(),
        response.message()
    );
}

/// Asserts that the response is exactly the given tip, without data.
pub fn assert_response_tip<D: Debug>(response: &Response<D>, code: &str, message: &str) {
    assert!(
        response.code() == code && response.message() == message,
        "Expected tip [{}] {}, got [{}] {}",
        code,
        message,
        response.code(),
        response.message()
    );
    assert!(
        response.data.is_none(),
        "Expected no data with tip [{}], got {:?}",
        code,
        response.data
    );
}

/// Asserts that the response is the system error, without data.
pub fn assert_response_system_error<D: Debug>(response: &Response<D>, codes: &ResponseCodes) {
    assert_response_tip(response, &codes.system_error_code, &codes.system_error_message);
}

/// Asserts that the response carries the expected data.
pub fn assert_response_data<D: Debug + PartialEq>(response: &Response<D>, expected: &D) {
    assert_eq!(
        response.data.as_ref(),
        Some(expected),
        "Expected data {:?}, got {:?}",
        expected,
        response.data
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_response_success() {
        let codes = ResponseCodes::default();
        let mut response = Response::with_data(1_u8);
        response.fill_missing(&codes.success_code, &codes.success_message);

        assert_response_success(&response, &codes);
        assert_response_data(&response, &1);
    }

    #[test]
    #[should_panic(expected = "Expected success")]
    fn test_assert_response_success_fails() {
        let response: Response<()> = Response::tip("100001", "bad");
        assert_response_success(&response, &ResponseCodes::default());
    }

    #[test]
    fn test_assert_response_tip() {
        let response: Response<()> = Response::tip("100001", "bad");
        assert_response_tip(&response, "100001", "bad");
    }

    #[test]
    #[should_panic(expected = "Expected no data")]
    fn test_assert_response_tip_with_data_fails() {
        let mut response = Response::tip("100001", "bad");
        response.data = Some(3);
        assert_response_tip(&response, "100001", "bad");
    }

    #[test]
    fn test_assert_response_system_error() {
        let codes = ResponseCodes::default();
        let response: Response<String> = Response::tip("999999", "System error");
        assert_response_system_error(&response, &codes);
    }
}
