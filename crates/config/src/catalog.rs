//! Product catalog
//!
//! Read-only reference data. Records are produced by an exhaustive match on
//! [`ProductId`], and the table is indexed by the same enum.

use harvest_chat_core::ProductId;
use once_cell::sync::Lazy;

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: &'static str,
    pub origin: &'static str,
    pub season: &'static str,
    /// Specification key/value pairs in display order
    pub specs: &'static [(&'static str, &'static str)],
    pub description: &'static str,
    pub nutrition: Option<&'static str>,
    pub usage: Option<&'static str>,
    pub storage: Option<&'static str>,
}

/// Product table keyed by [`ProductId`]
#[derive(Debug)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::build);

/// Process-wide catalog
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

impl Catalog {
    fn build() -> Self {
        Self {
            records: ProductId::ALL.into_iter().map(record).collect(),
        }
    }

    pub fn get(&self, id: ProductId) -> &ProductRecord {
        // ALL lists variants in declaration order, so the discriminant is the index
        &self.records[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    pub fn produce(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter().filter(|r| r.id.is_produce())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn record(id: ProductId) -> ProductRecord {
    match id {
        ProductId::OliveOil => ProductRecord {
            id,
            name: "Extra Virgin Olive Oil",
            origin: "Tunisia - Sfax Region",
            season: "Harvest November to February, shipped year-round",
            specs: &[
                ("Acidity", "≤ 0.8%"),
                ("Variety", "Chemlali"),
                ("Extraction", "Cold pressed, first extraction"),
                ("Packaging", "Glass bottles 250ml to 1L, tins 5L, drums 200L, IBC 1000L"),
                ("Certifications", "ISO 22000, organic on request"),
            ],
            description: "Fruity, well-balanced oil from century-old Chemlali groves around Sfax, \
                          pressed within hours of harvest.",
            nutrition: Some("Rich in monounsaturated fats, polyphenols and vitamin E"),
            usage: Some("Dressings, cold dishes, finishing and light cooking"),
            storage: Some("Keep sealed, away from light, between 14 and 18°C"),
        },
        ProductId::RapeseedOil => ProductRecord {
            id,
            name: "Refined Rapeseed Oil",
            origin: "European Union - France and Germany",
            season: "Available year-round",
            specs: &[
                ("Erucic acid", "< 2%"),
                ("Free fatty acids", "≤ 0.1%"),
                ("Processing", "Fully refined, bleached, deodorized"),
                ("Packaging", "PET bottles 1L to 5L, flexitank, bulk"),
                ("Certifications", "Non-GMO, ISCC"),
            ],
            description: "Neutral-tasting canola-quality oil for food service and industrial use.",
            nutrition: Some("Low in saturated fat, source of omega-3 ALA"),
            usage: Some("Frying, baking and food manufacturing"),
            storage: Some("Cool dry place, shelf life 18 months"),
        },
        ProductId::Orange => ProductRecord {
            id,
            name: "Maltese Blood Oranges",
            origin: "Tunisia - Cap Bon",
            season: "January to April",
            specs: &[
                ("Calibres", "3 to 8"),
                ("Brix", "≥ 11°"),
                ("Packaging", "Cartons 10kg and 15kg, open-top crates"),
                ("Certifications", "GlobalG.A.P."),
            ],
            description: "Sweet, seedless-to-low-seed oranges with the deep red blush Cap Bon is known for.",
            nutrition: Some("High in vitamin C and anthocyanins"),
            usage: Some("Fresh eating and juicing"),
            storage: Some("4 to 7°C, 90% relative humidity"),
        },
        ProductId::Apple => ProductRecord {
            id,
            name: "Fresh Apples",
            origin: "Tunisia - Kasserine and Sbiba",
            season: "August to November, cold-stored until March",
            specs: &[
                ("Varieties", "Golden Delicious, Royal Gala, Anna"),
                ("Calibres", "65-70mm to 80mm+"),
                ("Packaging", "Cartons 13kg and 18kg, tray packs"),
            ],
            description: "Crisp highland apples grown at altitude around Kasserine.",
            nutrition: None,
            usage: Some("Retail and processing"),
            storage: Some("0 to 2°C, controlled atmosphere for long storage"),
        },
        ProductId::Peach => ProductRecord {
            id,
            name: "Fresh Peaches",
            origin: "Tunisia - Sidi Bouzid",
            season: "May to August",
            specs: &[
                ("Varieties", "Yellow flesh, flat peach (paraguayo)"),
                ("Calibres", "A to AAA"),
                ("Packaging", "Single-layer cartons 5kg and 7kg"),
            ],
            description: "Early-season peaches from the irrigated orchards of Sidi Bouzid.",
            nutrition: None,
            usage: None,
            storage: Some("0 to 1°C, ship within 48 hours of picking"),
        },
        ProductId::Pear => ProductRecord {
            id,
            name: "Fresh Pears",
            origin: "Tunisia - Jendouba",
            season: "July to October",
            specs: &[
                ("Varieties", "Williams, Coscia"),
                ("Calibres", "60mm to 75mm+"),
                ("Packaging", "Cartons 12kg"),
            ],
            description: "Juicy summer pears from the northwest valleys.",
            nutrition: None,
            usage: None,
            storage: Some("-1 to 0°C"),
        },
        ProductId::Artichoke => ProductRecord {
            id,
            name: "Globe Artichokes",
            origin: "Tunisia - Bizerte and Manouba",
            season: "December to April",
            specs: &[
                ("Variety", "Violet de Provence, Blanc Hyérois"),
                ("Sizes", "Heads of 8 to 12cm"),
                ("Packaging", "Cartons of 12, 18 or 24 heads"),
            ],
            description: "Tender winter artichokes, also available as frozen hearts on request.",
            nutrition: Some("Good source of fibre and folate"),
            usage: None,
            storage: Some("0°C, 95% relative humidity"),
        },
    }
}
