use std::collections::HashMap;

use super::ids::{CategoryId, ProductId, TemplateId, UomId};
use super::uom::Uom;

/// A sellable product variant, as seen by rule matching.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    pub id: ProductId,
    pub template: TemplateId,
    pub category: Option<CategoryId>,
    /// The unit quantities of this product are counted in by default.
    pub uom: UomId,
}

/// A node in the product category tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Category {
    pub id: CategoryId,
    pub parent: Option<CategoryId>,
}

/// Read access to the host platform's product data.
///
/// Every lookup is fallible by returning `None`; rule matching treats a
/// missing record as "no match" rather than an error.
pub trait Catalog {
    fn product(&self, id: ProductId) -> Option<&Product>;
    fn category(&self, id: CategoryId) -> Option<&Category>;
    fn uom(&self, id: UomId) -> Option<&Uom>;

    /// Whether `ancestor` is `category` itself or one of its parents.
    ///
    /// Identity needs no category record. Walking to parents does: a chain
    /// that points at an unknown category, or loops back on itself, never
    /// matches.
    fn is_within(&self, category: CategoryId, ancestor: CategoryId) -> bool {
        let mut current = Some(category);
        let mut visited = Vec::new();
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if visited.contains(&id) {
                tracing::debug!(category = %id, "category chain loops; treating as no match");
                return false;
            }
            visited.push(id);
            current = match self.category(id) {
                Some(node) => node.parent,
                None => return false,
            };
        }
        false
    }
}

/// A [`Catalog`] held entirely in memory.
///
/// # Example
///
/// ```
/// use andgroup::{CategoryId, InMemoryCatalog, Product, ProductId, TemplateId, Uom, UomCategoryId, UomId};
///
/// let catalog = InMemoryCatalog::new()
///     .with_category(CategoryId(1), None)
///     .with_category(CategoryId(2), Some(CategoryId(1)))
///     .with_uom(Uom::reference(UomId(1), UomCategoryId(1)))
///     .with_product(Product {
///         id: ProductId(10),
///         template: TemplateId(10),
///         category: Some(CategoryId(2)),
///         uom: UomId(1),
///     });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, Product>,
    categories: HashMap<CategoryId, Category>,
    uoms: HashMap<UomId, Uom>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.insert_product(product);
        self
    }

    #[must_use]
    pub fn with_category(mut self, id: CategoryId, parent: Option<CategoryId>) -> Self {
        self.categories.insert(id, Category { id, parent });
        self
    }

    #[must_use]
    pub fn with_uom(mut self, uom: Uom) -> Self {
        self.uoms.insert(uom.id, uom);
        self
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    fn uom(&self, id: UomId) -> Option<&Uom> {
        self.uoms.get(&id)
    }
}
