use andgroup::{
    CatalogMatcher, CategoryId, InMemoryCatalog, Order, OrderLine, PricelistBuilder,
    PricingContext, Product, ProductId, TemplateId, Uom, UomCategoryId, UomId,
};
use rust_decimal_macros::dec;
use time::macros::date;

fn main() {
    // RUST_LOG=andgroup=debug shows why each group was rejected
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let units = UomId(1);
    let dozens = UomId(2);
    let catalog = InMemoryCatalog::new()
        .with_category(CategoryId(1), None)
        .with_category(CategoryId(2), Some(CategoryId(1)))
        .with_uom(Uom::reference(units, UomCategoryId(1)))
        .with_uom(Uom::reference(dozens, UomCategoryId(1)).with_factor(dec!(1) / dec!(12)))
        .with_product(Product {
            id: ProductId(10),
            template: TemplateId(10),
            category: Some(CategoryId(2)),
            uom: units,
        })
        .with_product(Product {
            id: ProductId(20),
            template: TemplateId(20),
            category: Some(CategoryId(1)),
            uom: units,
        });

    let pricelist = PricelistBuilder::new()
        // group 1: a dozen eggs from the food category plus any product 20
        .rule(1, |r| r.and_group(1).category(CategoryId(1)).min_quantity(dec!(12)))
        .rule(2, |r| r.and_group(1).product(ProductId(20)))
        // group 2: only valid in March
        .rule(3, |r| {
            r.and_group(2)
                .product(ProductId(10))
                .valid_from(date!(2025 - 03 - 01))
                .valid_until(date!(2025 - 03 - 31))
        })
        .rule(4, |r| r.and_group(2).product(ProductId(20)))
        .rule(5, |r| r.sequence(100))
        .build()
        .expect("failed to build pricelist");

    let order = Order::new(None)
        .line(OrderLine::new(ProductId(10), dec!(1)).in_uom(dozens))
        .line(OrderLine::new(ProductId(20), dec!(1)));
    let snapshot = order.snapshot();
    let ctx = PricingContext::new().at(date!(2025 - 04 - 15));

    let matcher = CatalogMatcher::new(&catalog);
    let report = pricelist.reduce_detailed(&matcher, &snapshot, &ctx);

    println!("{report}");
    println!();
    println!("Valid groups: {:?}", report.valid_groups());
    println!("Rejected groups: {:?}", report.rejected_groups());
    println!("Duration: {:?}", report.duration());
}
