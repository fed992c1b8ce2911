pub mod conversion;
pub mod table;

pub use conversion::{
    moneyline_str_to_probability, moneyline_to_probability, probability_to_price, round_to,
};
pub use table::OddsTableBuilder;
