//! Static product catalog

use std::collections::HashSet;

use crate::calculator;
use crate::error::{EcoError, Result};
use crate::factors::EmissionFactorTable;
use crate::models::{Bounds, FootprintRequest, FootprintResult, ProductRecord};

/// Where a catalog record takes its emission factor from
enum Ef {
    Category,
    Override(f64), // recycled variants differ from the category default
}

struct Seed {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
    ef: Ef,
    best_co2g: f64,
    worst_co2g: f64,
}

const fn seed(
    id: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
    ef: Ef,
    best_co2g: f64,
    worst_co2g: f64,
) -> Seed {
    Seed {
        id,
        name,
        category,
        description,
        ef,
        best_co2g,
        worst_co2g,
    }
}

static BUILTIN_PRODUCTS: &[Seed] = &[
    seed("1", "Bamboo Cutlery Set", "bamboo", "Reusable bamboo cutlery set with carrying case", Ef::Category, 2.0, 10.0),
    seed("2", "Recycled Paper Notebook", "paper", "A4 notebook made from 100% recycled paper", Ef::Category, 3.0, 15.0),
    seed("3", "Recycled Glass Bottle", "glass", "500ml glass bottle made from recycled glass", Ef::Category, 5.0, 20.0),
    seed("4", "Cardboard Packaging Box", "cardboard", "Eco-friendly cardboard packaging box", Ef::Category, 4.0, 25.0),
    seed("5", "Recycled Steel Water Bottle", "steel", "Stainless steel water bottle made from recycled steel", Ef::Override(0.5), 8.0, 50.0),
    seed("6", "Recycled Aluminum Can", "aluminum", "330ml aluminum can made from recycled aluminum", Ef::Override(2.5), 10.0, 60.0),
    seed("7", "Concrete Building Block", "concrete", "Standard concrete building block", Ef::Category, 1.0, 5.0),
    seed("8", "Polyester Jacket", "polyester", "Lightweight polyester jacket", Ef::Category, 15.0, 100.0),
    seed("9", "Virgin Plastic Bottle", "plastic", "500ml plastic bottle made from virgin plastic", Ef::Category, 20.0, 150.0),
    seed("10", "Aluminum Foil", "aluminum", "Standard aluminum foil roll", Ef::Category, 25.0, 200.0),
    seed("11", "Cotton T-Shirt", "cotton", "100% cotton t-shirt", Ef::Category, 30.0, 300.0),
    seed("12", "Leather Wallet", "leather", "Genuine leather wallet", Ef::Category, 40.0, 400.0),
    seed("13", "Smartphone", "electronics", "Smartphone with high energy consumption", Ef::Category, 100.0, 800.0),
    seed("14", "Cement Block", "cement", "Standard cement building block", Ef::Category, 5.0, 50.0),
    seed("15", "Laptop Computer", "electronics", "Laptop computer with high energy consumption", Ef::Override(30.0), 200.0, 1200.0),
    seed("16", "Beef Jerky (for comparison)", "beef", "Dried beef jerky - extremely high carbon footprint", Ef::Category, 300.0, 2000.0),
];

impl ProductRecord {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.best_co2g, self.worst_co2g)
    }

    /// Footprint of one unit weighing `weight_kg`, scored against this product's bounds
    pub fn footprint(&self, weight_kg: f64, packaging_g: f64, transport_g: f64) -> FootprintResult {
        let request = FootprintRequest::new(weight_kg, self.ef)
            .with_packaging(packaging_g)
            .with_transport(transport_g);
        calculator::compute_footprint(&request, self.bounds())
    }
}

/// Immutable list of products, validated on construction
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<ProductRecord>,
}

impl Catalog {
    pub fn new(products: Vec<ProductRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        for p in &products {
            if !seen.insert(p.id.as_str()) {
                return Err(EcoError::InvalidCatalog(format!("duplicate product id '{}'", p.id)));
            }
            if !(p.ef >= 0.0) {
                return Err(EcoError::InvalidCatalog(format!(
                    "product '{}' has negative emission factor {}",
                    p.id, p.ef
                )));
            }
            if !(p.best_co2g >= 0.0 && p.worst_co2g >= p.best_co2g) {
                return Err(EcoError::InvalidCatalog(format!(
                    "product '{}' bounds must satisfy worst >= best >= 0 (best {}, worst {})",
                    p.id, p.best_co2g, p.worst_co2g
                )));
            }
        }
        Ok(Self { products })
    }

    /// The built-in catalog, with factors resolved against `factors`
    pub fn builtin(factors: &EmissionFactorTable) -> Result<Self> {
        let mut products = Vec::with_capacity(BUILTIN_PRODUCTS.len());
        for s in BUILTIN_PRODUCTS {
            let ef = match s.ef {
                Ef::Category => factors.get(s.category)?.kg_co2_per_kg,
                Ef::Override(ef) => ef,
            };
            products.push(ProductRecord {
                id: s.id.to_string(),
                name: s.name.to_string(),
                category: s.category.to_string(),
                description: s.description.to_string(),
                ef,
                best_co2g: s.best_co2g,
                worst_co2g: s.worst_co2g,
            });
        }
        Self::new(products)
    }

    pub fn all(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn find(&self, id: &str) -> Option<&ProductRecord> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn get(&self, id: &str) -> Result<&ProductRecord> {
        self.find(id)
            .ok_or_else(|| EcoError::UnknownProduct(id.to_string()))
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ProductRecord> {
        let key = category.trim();
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(key))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
