// Stamp package deployment on mainnet
pub const PACKAGE_ID: &str = "0x71ace10bed80a93f30bc296c1622a10c2956f87f93393c200e401ef735ad8cb4";
pub const CONFIG_OBJECT_ID: &str =
    "0x5e5705f3497757d8e120e51143e81dab8e58d24ff1ba9bcf1e4af6c4b756fb9f";
pub const ADMIN_CAP_ID: &str = "0x535681c0cd88aea86ef321958c3dff33ea3aa3e5400ddd9f44fb57f214ed0f66";
pub const PUBLISHER_ID: &str = "0xfca2f7ec19fa71acad6ea7fbc5301da7bcb614a58bc37d40d2f3f6cbe5cd8c98";
// Table object holding the registered events as dynamic fields
pub const EVENTS_PARENT_ID: &str =
    "0x48f704fd831a20e26d03fdac777acadbeb2e29c405a6a66012294dcf6b2f4127";

pub const STAMP_MODULE: &str = "stamp";

// FILES
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

pub const ADMIN_KEY_ENV: &str = "SUI_ADMIN_PRIVATE_KEY";

pub const ADDRESS_PREFIX: &str = "0x";
// Canonical Sui address: 0x + 64 hex digits
pub const ADDRESS_HEX_DIGITS: usize = 64;

pub const PRIVATE_KEY_HRP: &str = "suiprivkey";
pub const ED25519_FLAG: u8 = 0x00;
