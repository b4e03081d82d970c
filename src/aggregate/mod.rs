//! Aggregation engine: filter raw rows and fold their year columns into the shapes each
//! chart draws.
//!
//! - [`filter_rows`]: conjunction of equality / membership predicates
//! - [`sum_by_keys`]: per composite key sums (missing cells count as 0, duplicates add up)
//! - [`build_series`]: one year-ordered series per entity, in entity order
//! - [`build_stack_segments`]: cumulative segments over a fixed subgroup order
//! - [`top_n`]: largest keys by total, recomputed per frame
//!
//! ```
//! use ghg_rs::aggregate::{Dimension, Filter, YearSelector, filter_rows, sum_by_keys};
//! use ghg_rs::models::RawRecord;
//!
//! let rows = vec![
//!     RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 10.0).with_value(2021, 20.0),
//!     RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 5.0),
//! ];
//! let co2 = filter_rows(&rows, &Filter::new().gas("CO2"));
//! let totals = sum_by_keys(co2, &[Dimension::Region, Dimension::Year], &YearSelector::All);
//! assert_eq!(totals.get2("Asia", 2020), Some(15.0));
//! assert_eq!(totals.get2("Asia", 2021), Some(20.0));
//! ```

mod filter;
mod keys;
mod rank;
mod series;
mod stack;

pub use filter::{Filter, Predicate, filter_rows};
pub use keys::{CompositeKey, Dimension, KeyPart, Lookup, YearSelector, sum_by_keys};
pub use rank::{Totals, rank_desc, top_n};
pub use series::{build_series, sort_by_total_desc};
pub use stack::{build_stack_segments, stack_total_for, stack_totals};
