use rust_decimal::Decimal;

use super::ids::{PartnerId, ProductId, UomId};

/// A sale order as held by the host: the partner and its current lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub partner: Option<PartnerId>,
    pub lines: Vec<OrderLine>,
}

/// One line of an [`Order`]. Section and note lines carry no product.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderLine {
    pub product: Option<ProductId>,
    pub quantity: Decimal,
    pub uom: Option<UomId>,
}

impl OrderLine {
    #[must_use]
    pub fn new(product: ProductId, quantity: Decimal) -> Self {
        Self {
            product: Some(product),
            quantity,
            uom: None,
        }
    }

    /// A line without a product (section heading, note).
    #[must_use]
    pub fn note() -> Self {
        Self {
            product: None,
            quantity: Decimal::ZERO,
            uom: None,
        }
    }

    #[must_use]
    pub fn in_uom(mut self, uom: UomId) -> Self {
        self.uom = Some(uom);
        self
    }
}

impl Order {
    #[must_use]
    pub fn new(partner: Option<PartnerId>) -> Self {
        Self {
            partner,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn line(mut self, line: OrderLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Assemble the whole-order view used for AND-group evaluation.
    ///
    /// Must be called again after any edit to the order; a snapshot never
    /// tracks later changes.
    #[must_use]
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot::assemble(self)
    }
}

/// One priced line of an order, frozen for the duration of a pricing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderLineSnapshot {
    pub product: ProductId,
    pub quantity: Decimal,
    pub partner: Option<PartnerId>,
    pub uom: Option<UomId>,
}

impl OrderLineSnapshot {
    #[must_use]
    pub fn new(product: ProductId, quantity: Decimal) -> Self {
        Self {
            product,
            quantity,
            partner: None,
            uom: None,
        }
    }

    #[must_use]
    pub fn in_uom(mut self, uom: UomId) -> Self {
        self.uom = Some(uom);
        self
    }

    #[must_use]
    pub fn for_partner(mut self, partner: PartnerId) -> Self {
        self.partner = Some(partner);
        self
    }
}

/// The complete set of product lines of one order.
///
/// Group validity is a property of the whole order, so every line priced
/// from the same order must be evaluated against the same snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderSnapshot {
    lines: Vec<OrderLineSnapshot>,
}

impl OrderSnapshot {
    #[must_use]
    pub fn new(lines: Vec<OrderLineSnapshot>) -> Self {
        Self { lines }
    }

    /// Build a snapshot from every product line of `order`, stamping each
    /// with the order's partner. Lines without a product are skipped.
    #[must_use]
    pub fn assemble(order: &Order) -> Self {
        let lines = order
            .lines
            .iter()
            .filter_map(|line| {
                line.product.map(|product| OrderLineSnapshot {
                    product,
                    quantity: line.quantity,
                    partner: order.partner,
                    uom: line.uom,
                })
            })
            .collect();
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[OrderLineSnapshot] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromIterator<OrderLineSnapshot> for OrderSnapshot {
    fn from_iter<I: IntoIterator<Item = OrderLineSnapshot>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
