// The single error the scanner raises.  Scanning stops at the first one and
// the caller decides presentation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanError {
    pub line: u32,
    pub message: String,
}

impl ScanError {
    pub fn new(line: u32, message: &str) -> ScanError {
        ScanError {
            line,
            message: message.to_string(),
        }
    }
}
