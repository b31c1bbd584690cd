//! RDP configuration handling
//!
//! - [`parser`] reads `key:type:value` directive text
//! - [`settings`] derives display settings from a display and quality profile
//! - [`serializer`] writes the final `.rdp` file

pub mod parser;
pub mod serializer;
pub mod settings;

pub use parser::{
    RdpDirective, RdpValueType, parse_config_string, parse_directive, parse_directives,
};
pub use serializer::{rdp_directives, render_rdp};
pub use settings::RdpDisplaySettings;
