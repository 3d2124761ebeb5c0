use andgroup::{
    CatalogMatcher, InMemoryCatalog, Order, OrderLine, OrderLineSnapshot, PartnerId,
    PricelistBuilder, PricelistRule, PricingContext, Product, ProductId, TemplateId, Uom,
    UomCategoryId, UomId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SHIRT: ProductId = ProductId(1);
const TIE: ProductId = ProductId(2);
const BELT: ProductId = ProductId(3);

/// Stand-in for the host pricing engine: list price 50, 20% off when a
/// grouped rule applies to the line.
fn compose(rules: &[&PricelistRule], line: &OrderLineSnapshot, _: &PricingContext) -> Decimal {
    let bundled = rules
        .iter()
        .any(|r| r.group().is_some() && r.product == Some(line.product));
    let unit = if bundled { dec!(40) } else { dec!(50) };
    unit * line.quantity
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut catalog = InMemoryCatalog::new().with_uom(Uom::reference(UomId(1), UomCategoryId(1)));
    for id in [SHIRT, TIE, BELT] {
        catalog.insert_product(Product {
            id,
            template: TemplateId(id.0),
            category: None,
            uom: UomId(1),
        });
    }
    let matcher = CatalogMatcher::new(&catalog);

    let pricelist = PricelistBuilder::new()
        .rule(1, |r| r.and_group(1).product(SHIRT).sequence(1))
        .rule(2, |r| r.and_group(1).product(TIE).sequence(1))
        .rule(3, |r| r.sequence(10))
        .build()
        .expect("failed to build pricelist");

    let mut order = Order::new(Some(PartnerId(42)))
        .line(OrderLine::new(SHIRT, dec!(2)))
        .line(OrderLine::new(TIE, dec!(1)))
        .line(OrderLine::new(BELT, dec!(1)));

    for round in ["full order", "tie removed"] {
        // every edit needs a fresh snapshot and a fresh pass
        let snapshot = order.snapshot();
        let pass = pricelist.pricing_pass(&matcher, &snapshot, PricingContext::new());

        println!("{round}:");
        let totals = pass.price_order(&compose);
        for (assignment, total) in pass.assignments().iter().zip(totals) {
            let rule = assignment
                .rule
                .map_or_else(|| "-".to_owned(), |r| r.id.to_string());
            println!("  {} -> {rule}, total {total}", assignment.line.product);
        }

        order.lines.retain(|line| line.product != Some(TIE));
    }
}
