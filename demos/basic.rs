use andgroup::{
    CatalogMatcher, InMemoryCatalog, OrderLineSnapshot, OrderSnapshot, PricelistBuilder,
    PricingContext, Product, ProductId, TemplateId, Uom, UomCategoryId, UomId,
};
use rust_decimal_macros::dec;

const A: ProductId = ProductId(1);
const B: ProductId = ProductId(2);
const C: ProductId = ProductId(3);

fn main() {
    let mut catalog = InMemoryCatalog::new().with_uom(Uom::reference(UomId(1), UomCategoryId(1)));
    for id in [A, B, C] {
        catalog.insert_product(Product {
            id,
            template: TemplateId(id.0),
            category: None,
            uom: UomId(1),
        });
    }

    // Rules 1 and 2 form AND-group 1: both must find a line before either applies.
    let pricelist = PricelistBuilder::new()
        .rule(1, |r| r.and_group(1).product(A).min_quantity(dec!(2)))
        .rule(2, |r| r.and_group(1).product(B).min_quantity(dec!(1)))
        .rule(3, |r| r.product(C))
        .build()
        .expect("failed to build pricelist");

    println!("{pricelist}");

    let matcher = CatalogMatcher::new(&catalog);
    let ctx = PricingContext::new();

    let enough = OrderSnapshot::new(vec![
        OrderLineSnapshot::new(A, dec!(3)),
        OrderLineSnapshot::new(B, dec!(1)),
    ]);
    let short = OrderSnapshot::new(vec![
        OrderLineSnapshot::new(A, dec!(1)),
        OrderLineSnapshot::new(B, dec!(1)),
    ]);

    for (name, order) in [("A x3 + B x1", &enough), ("A x1 + B x1", &short)] {
        let ids: Vec<String> = pricelist
            .applicable_rules(&matcher, order, &ctx)
            .iter()
            .map(|r| r.id.to_string())
            .collect();
        println!("{name}: [{}]", ids.join(", "));
    }
}
