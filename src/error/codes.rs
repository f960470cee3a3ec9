/// Error code registry for scriptport
///
/// Error codes are organized by category:
/// - 1000-1999: Input errors
/// - 2000-2999: Configuration errors
/// - 3000-3999: Generation errors (transport, remote service, response)
/// - 4000-4999: Storage errors
/// - 5000-5999: Build errors
pub struct ErrorCode;

impl ErrorCode {
    // Input errors (1000-1999)
    pub const INPUT_NOT_FOUND: u16 = 1001;
    pub const INPUT_IS_DIRECTORY: u16 = 1002;
    pub const INPUT_UNREADABLE: u16 = 1003;
    pub const INPUT_UNSUPPORTED_TYPE: u16 = 1004;

    // Configuration errors (2000-2999)
    pub const CONFIG_MISSING_CREDENTIAL: u16 = 2001;
    pub const CONFIG_UNKNOWN_PROVIDER: u16 = 2002;
    pub const CONFIG_HTTP_CLIENT: u16 = 2003;
    pub const CONFIG_TEMPLATE: u16 = 2004;

    // Generation errors (3000-3999)
    pub const GEN_TRANSPORT: u16 = 3001;
    pub const GEN_TIMEOUT: u16 = 3002;
    pub const GEN_REMOTE_ERROR: u16 = 3003;
    pub const GEN_MALFORMED_RESPONSE: u16 = 3004;
    pub const GEN_EMPTY_RESULT: u16 = 3005;

    // Storage errors (4000-4999)
    pub const STORAGE_CREATE_DIR: u16 = 4001;
    pub const STORAGE_WRITE: u16 = 4002;

    // Build errors (5000-5999)
    pub const BUILD_GENERIC: u16 = 5000;
    pub const BUILD_FAILED: u16 = 5001;
    pub const BUILD_TOOLCHAIN_NOT_FOUND: u16 = 5002;
    pub const BUILD_SPAWN_FAILED: u16 = 5003;
    pub const BUILD_SIGNAL_RECEIVED: u16 = 5004;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_ranges() {
        let families = [
            (1000, [ErrorCode::INPUT_NOT_FOUND, ErrorCode::INPUT_UNSUPPORTED_TYPE]),
            (2000, [ErrorCode::CONFIG_MISSING_CREDENTIAL, ErrorCode::CONFIG_TEMPLATE]),
            (3000, [ErrorCode::GEN_TRANSPORT, ErrorCode::GEN_EMPTY_RESULT]),
            (4000, [ErrorCode::STORAGE_CREATE_DIR, ErrorCode::STORAGE_WRITE]),
            (5000, [ErrorCode::BUILD_GENERIC, ErrorCode::BUILD_SIGNAL_RECEIVED]),
        ];
        for (base, codes) in families {
            for code in codes {
                assert!(code >= base && code < base + 1000, "{code} outside {base}");
            }
        }
    }
}
