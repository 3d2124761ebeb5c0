use andgroup::{
    CatalogMatcher, CategoryId, GroupOutcome, InMemoryCatalog, MatchInput, OrderLineSnapshot,
    OrderSnapshot, Pricelist, PricelistBuilder, PricelistRule, PricingContext, Product, ProductId,
    RuleId, TemplateId, Uom, UomCategoryId, UomId,
};
use rust_decimal_macros::dec;
use time::macros::date;

const A: ProductId = ProductId(1);
const B: ProductId = ProductId(2);
const C: ProductId = ProductId(3);
const X: ProductId = ProductId(4);
const Y: ProductId = ProductId(5);

const UNIT: UomId = UomId(1);
const DOZEN: UomId = UomId(2);
const KG: UomId = UomId(3);

fn catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new()
        .with_category(CategoryId(1), None)
        .with_category(CategoryId(2), Some(CategoryId(1)))
        .with_uom(Uom::reference(UNIT, UomCategoryId(1)))
        .with_uom(Uom::reference(DOZEN, UomCategoryId(1)).with_factor(dec!(1) / dec!(12)))
        .with_uom(Uom::reference(KG, UomCategoryId(2)));
    for id in 1..=5 {
        catalog.insert_product(Product {
            id: ProductId(id),
            template: TemplateId(id),
            category: Some(CategoryId(2)),
            uom: UNIT,
        });
    }
    catalog
}

fn lines(items: &[(ProductId, rust_decimal::Decimal)]) -> OrderSnapshot {
    items
        .iter()
        .map(|&(product, qty)| OrderLineSnapshot::new(product, qty))
        .collect()
}

fn applicable(pricelist: &Pricelist, order: &OrderSnapshot) -> Vec<u64> {
    applicable_with(pricelist, order, &PricingContext::new())
}

fn applicable_with(pricelist: &Pricelist, order: &OrderSnapshot, ctx: &PricingContext) -> Vec<u64> {
    let catalog = catalog();
    let matcher = CatalogMatcher::new(&catalog);
    let mut ids: Vec<u64> = pricelist
        .applicable_rules(&matcher, order, ctx)
        .iter()
        .map(|r| r.id.0)
        .collect();
    ids.sort_unstable();
    ids
}

fn e2e_pricelist() -> Pricelist {
    PricelistBuilder::new()
        .rule(1, |r| r.and_group(1).product(A).min_quantity(dec!(2)))
        .rule(2, |r| r.and_group(1).product(B).min_quantity(dec!(1)))
        .rule(3, |r| r.product(C))
        .build()
        .unwrap()
}

fn pair_group() -> Pricelist {
    PricelistBuilder::new()
        .rule(10, |r| r.and_group(1).product(X).min_quantity(dec!(1)))
        .rule(11, |r| r.and_group(1).product(Y).min_quantity(dec!(1)))
        .build()
        .unwrap()
}

#[test]
fn e2e_group_satisfied() {
    let order = lines(&[(A, dec!(3)), (B, dec!(1))]);
    assert_eq!(applicable(&e2e_pricelist(), &order), vec![1, 2, 3]);
}

#[test]
fn e2e_insufficient_quantity_drops_group() {
    let order = lines(&[(A, dec!(1)), (B, dec!(1))]);
    assert_eq!(applicable(&e2e_pricelist(), &order), vec![3]);
}

#[test]
fn rules_satisfied_by_separate_lines() {
    let order = lines(&[(X, dec!(1)), (Y, dec!(1))]);
    assert_eq!(applicable(&pair_group(), &order), vec![10, 11]);
}

#[test]
fn single_missing_match_invalidates_group() {
    let order = lines(&[(X, dec!(1))]);
    assert!(applicable(&pair_group(), &order).is_empty());
}

#[test]
fn independent_groups() {
    let pricelist = PricelistBuilder::new()
        .rule(1, |r| r.and_group(1).product(A))
        .rule(2, |r| r.and_group(1).product(B))
        .rule(3, |r| r.and_group(2).product(A))
        .rule(4, |r| r.and_group(2).product(Y))
        .rule(5, |r| r.product(C))
        .build()
        .unwrap();

    let order = lines(&[(A, dec!(1)), (B, dec!(1))]);
    assert_eq!(applicable(&pricelist, &order), vec![1, 2, 5]);
}

#[test]
fn no_groups_is_identity() {
    let pricelist = PricelistBuilder::new()
        .rule(1, |r| r.product(A).min_quantity(dec!(100)))
        .rule(2, |r| r.product(Y))
        .build()
        .unwrap();

    // rules that match nothing still pass through unchanged
    assert_eq!(applicable(&pricelist, &lines(&[(B, dec!(1))])), vec![1, 2]);
    assert_eq!(applicable(&pricelist, &OrderSnapshot::default()), vec![1, 2]);
}

#[test]
fn empty_order_drops_every_group() {
    assert_eq!(applicable(&e2e_pricelist(), &OrderSnapshot::default()), vec![3]);
}

#[test]
fn group_checked_against_whole_order_not_priced_line() {
    let pricelist = e2e_pricelist();
    let catalog = catalog();
    let matcher = CatalogMatcher::new(&catalog);
    let order = lines(&[(A, dec!(3)), (B, dec!(1))]);
    let ctx = PricingContext::new();

    // pricing line A alone still sees B in the order
    let line_a = &order.lines()[0];
    let winner = pricelist.rule_for_line(&matcher, &order, line_a, &ctx);
    assert_eq!(winner.map(|r| r.id), Some(RuleId(1)));

    // a single-line snapshot cannot prove the group
    let only_a = lines(&[(A, dec!(3))]);
    let winner = pricelist.rule_for_line(&matcher, &only_a, &only_a.lines()[0], &ctx);
    assert_eq!(winner, None);
}

#[test]
fn quantity_in_other_unit_is_converted() {
    // rule 1 wants 2 units of A; a line of 1 dozen A is 12 units
    let order = OrderSnapshot::new(vec![
        OrderLineSnapshot::new(A, dec!(1)).in_uom(DOZEN),
        OrderLineSnapshot::new(B, dec!(1)),
    ]);
    assert_eq!(applicable(&e2e_pricelist(), &order), vec![1, 2, 3]);
}

#[test]
fn default_unit_applies_to_lines_without_one() {
    // 0.25 dozen = 3 units
    let order = lines(&[(A, dec!(0.25)), (B, dec!(1))]);
    let ctx = PricingContext::new().default_uom(DOZEN);
    assert_eq!(applicable_with(&e2e_pricelist(), &order, &ctx), vec![1, 2, 3]);
    assert_eq!(applicable(&e2e_pricelist(), &order), vec![3]);
}

#[test]
fn incompatible_unit_falls_back_to_raw_quantity() {
    let order = OrderSnapshot::new(vec![
        OrderLineSnapshot::new(A, dec!(5)).in_uom(KG),
        OrderLineSnapshot::new(B, dec!(1)),
    ]);
    assert_eq!(applicable(&e2e_pricelist(), &order), vec![1, 2, 3]);
}

#[test]
fn date_window_can_invalidate_group() {
    let pricelist = PricelistBuilder::new()
        .rule(1, |r| r.and_group(1).product(A))
        .rule(2, |r| {
            r.and_group(1)
                .product(B)
                .valid_from(date!(2025 - 03 - 01))
                .valid_until(date!(2025 - 03 - 31))
        })
        .build()
        .unwrap();
    let order = lines(&[(A, dec!(1)), (B, dec!(1))]);

    let in_window = PricingContext::new().at(date!(2025 - 03 - 15));
    let after = PricingContext::new().at(date!(2025 - 04 - 01));
    assert_eq!(applicable_with(&pricelist, &order, &in_window), vec![1, 2]);
    assert!(applicable_with(&pricelist, &order, &after).is_empty());
}

#[test]
fn category_rule_in_group() {
    let pricelist = PricelistBuilder::new()
        .rule(1, |r| r.and_group(1).category(CategoryId(1)).min_quantity(dec!(5)))
        .rule(2, |r| r.and_group(1).product(B))
        .build()
        .unwrap();

    let order = lines(&[(A, dec!(5)), (B, dec!(1))]);
    assert_eq!(applicable(&pricelist, &order), vec![1, 2]);

    let small = lines(&[(A, dec!(4)), (B, dec!(1))]);
    assert!(applicable(&pricelist, &small).is_empty());
}

#[test]
fn broken_category_chain_means_no_match() {
    let catalog = InMemoryCatalog::new()
        .with_category(CategoryId(1), Some(CategoryId(404)))
        .with_uom(Uom::reference(UNIT, UomCategoryId(1)))
        .with_product(Product {
            id: A,
            template: TemplateId(1),
            category: Some(CategoryId(1)),
            uom: UNIT,
        });
    let matcher = CatalogMatcher::new(&catalog);
    let rule = PricelistRule {
        category: Some(CategoryId(9)),
        and_group: 1,
        apply_and_logic: true,
        ..PricelistRule::new(RuleId(1))
    };
    let pricelist = PricelistBuilder::new().push(rule).build().unwrap();
    let order = lines(&[(A, dec!(1))]);

    let report = pricelist.reduce_detailed(&matcher, &order, &PricingContext::new());
    assert!(report.kept().is_empty());
    assert_eq!(
        report.group(1),
        Some(GroupOutcome::Unmatched { rule: RuleId(1) })
    );
}

#[test]
fn product_missing_from_catalog_never_matches_lookup_rules() {
    let pricelist = PricelistBuilder::new()
        .rule(1, |r| r.and_group(1).template(TemplateId(1)))
        .build()
        .unwrap();
    let order = lines(&[(ProductId(999), dec!(1))]);
    assert!(applicable(&pricelist, &order).is_empty());
}

#[test]
fn duplicated_lines_do_not_change_verdict() {
    let once = lines(&[(A, dec!(3)), (B, dec!(1))]);
    let twice = lines(&[(A, dec!(3)), (B, dec!(1)), (A, dec!(3)), (B, dec!(1))]);
    let pricelist = e2e_pricelist();
    assert_eq!(applicable(&pricelist, &once), applicable(&pricelist, &twice));
}

#[test]
fn quantities_are_not_summed_across_lines() {
    // two lines of A at 1 each do not satisfy a minimum of 2
    let order = lines(&[(A, dec!(1)), (A, dec!(1)), (B, dec!(1))]);
    assert_eq!(applicable(&e2e_pricelist(), &order), vec![3]);
}

#[test]
fn match_input_reaches_the_matcher() {
    let pricelist = e2e_pricelist();
    let order = lines(&[(A, dec!(3)), (B, dec!(1))]);
    let ctx = PricingContext::new().at(date!(2025 - 01 - 01));
    let seen_date = |_: &PricelistRule, input: &MatchInput| input.date == Some(date!(2025 - 01 - 01));

    let kept = pricelist.applicable_rules(&seen_date, &order, &ctx);
    assert_eq!(kept.len(), 3);
}

#[test]
fn unitless_line_is_converted_to_rule_unit() {
    // group asks for 2 dozen A; a line of 20 A carries no unit and means 20 units
    let pricelist = PricelistBuilder::new()
        .rule(1, |r| r.and_group(1).product(A).uom(DOZEN).min_quantity(dec!(2)))
        .rule(2, |r| r.and_group(1).product(B))
        .build()
        .unwrap();

    assert!(applicable(&pricelist, &lines(&[(A, dec!(20)), (B, dec!(1))])).is_empty());
    assert_eq!(
        applicable(&pricelist, &lines(&[(A, dec!(24)), (B, dec!(1))])),
        vec![1, 2]
    );
}

#[test]
fn minimum_met_within_unit_precision() {
    // 1.995 units rounds to 2.00 at the unit's 0.01 precision
    let order = lines(&[(A, dec!(1.995)), (B, dec!(1))]);
    assert_eq!(applicable(&e2e_pricelist(), &order), vec![1, 2, 3]);

    let below = lines(&[(A, dec!(1.994)), (B, dec!(1))]);
    assert_eq!(applicable(&e2e_pricelist(), &below), vec![3]);
}
