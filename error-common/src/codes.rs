// Standardized error codes for the iCare subscriber engine

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
    pub const COORDINATE_OUT_OF_RANGE: &str = "VALIDATION_1004";
}

pub mod lookup {
    pub const RECORD_NOT_FOUND: &str = "LOOKUP_2001";
    pub const SEQUENCE_NOT_FOUND: &str = "LOOKUP_2002";
}

pub mod storage {
    pub const CONNECTION_FAILED: &str = "DB_4001";
    pub const QUERY_FAILED: &str = "DB_4002";
    pub const CONSTRAINT_VIOLATION: &str = "DB_4003";
}

pub mod system {
    pub const UNEXPECTED: &str = "SYS_5001";
}
