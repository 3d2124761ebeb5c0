//! AND-grouped pricelist rules.
//!
//! A rule tagged with a positive AND-group only applies when every rule of
//! that group matches at least one line of the order being priced. This
//! crate decides which groups hold for a given order and hands the reduced
//! rule set to the host's pricing engine.

mod build;
mod evaluate;
mod matching;
mod pass;
mod types;

pub use evaluate::{reduce, reduce_detailed};
pub use matching::{CatalogMatcher, MatchInput, RuleMatcher};
pub use pass::{LineAssignment, PriceComposer, PricingPass};
pub use types::{
    compare_quantities, BuildError, Catalog, Category, CategoryId, GroupOutcome, InMemoryCatalog,
    Order, OrderLine, OrderLineSnapshot, OrderSnapshot, PartnerId, Pricelist, PricelistBuilder,
    PricelistRule, PricingContext, Product, ProductId, ReductionReport, RuleBuilder, RuleId,
    TemplateId, Uom, UomCategoryId, UomError, UomId,
};
