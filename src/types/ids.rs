use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                $name(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }
    };
}

id_type!(
    /// Identity of a pricelist rule.
    RuleId,
    "rule"
);
id_type!(
    /// A concrete product variant.
    ProductId,
    "product"
);
id_type!(
    /// A product template; several variants may share one.
    TemplateId,
    "template"
);
id_type!(CategoryId, "category");
id_type!(
    /// A unit of measure.
    UomId,
    "uom"
);
id_type!(
    /// A family of mutually convertible units (e.g. weight, length).
    UomCategoryId,
    "uom-category"
);
id_type!(PartnerId, "partner");
