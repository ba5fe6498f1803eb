pub mod codes {
    pub const MISSING_ARGUMENT: &str = "TM101";
    pub const INVALID_SPECIFIER: &str = "TM102";
    pub const PACKAGE_NOT_FOUND: &str = "TM110";
    pub const DEPENDENCY_LOAD: &str = "TM120";
    pub const DEPENDENCY_INSTALL: &str = "TM121";
    pub const MODULE_LOAD: &str = "TM130";
    pub const SESSION: &str = "TM201";
    pub const CACHE_CLEAR: &str = "TM301";
    pub const GENERIC: &str = "TM000";
}
