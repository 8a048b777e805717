pub mod conversion;
pub mod currency;
pub mod estimates;
pub mod gas_modal;
pub mod selectors;

pub use conversion::{
    add_currencies, convert, convert_value, multiply_currencies, AddOptions, ConversionOptions,
    MultiplyOptions,
};
pub use estimates::build_renderable_estimates;
pub use gas_modal::build_gas_modal_view;
