mod catalog;
mod context;
mod error;
mod ids;
mod order;
mod pricelist;
mod report;
mod rule;
mod uom;

pub use catalog::{Catalog, Category, InMemoryCatalog, Product};
pub use context::PricingContext;
pub use error::{BuildError, UomError};
pub use ids::{CategoryId, PartnerId, ProductId, RuleId, TemplateId, UomCategoryId, UomId};
pub use order::{Order, OrderLine, OrderLineSnapshot, OrderSnapshot};
pub use pricelist::{Pricelist, PricelistBuilder, RuleBuilder};
pub use report::{GroupOutcome, ReductionReport};
pub use rule::PricelistRule;
pub use uom::{compare_quantities, Uom};
