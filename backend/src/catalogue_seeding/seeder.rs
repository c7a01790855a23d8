//! Insert a registry product set through the storage port.

use catalogue_seed::{ProductSeed, ProductSet};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::ports::{Storage, StorageError};
use crate::domain::{NewProduct, ProductValidationError};

/// Counts reported after seeding a product set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Name of the product set applied.
    pub set_name: String,
    /// Products written by this run.
    pub inserted: usize,
    /// Products skipped because their part number already existed.
    pub skipped: usize,
}

/// Errors raised while converting or persisting seed products.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueSeedingError {
    /// The price could not be parsed as a decimal.
    #[error("product {part_number} has unparseable price '{value}'")]
    InvalidPrice { part_number: String, value: String },
    /// The product breaks a catalogue invariant.
    #[error("product {part_number} is invalid: {source}")]
    InvalidProduct {
        part_number: String,
        #[source]
        source: ProductValidationError,
    },
    /// Storage rejected a write for a reason other than a duplicate.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn to_new_product(seed: &ProductSeed) -> Result<NewProduct, CatalogueSeedingError> {
    let price: Decimal = seed
        .price
        .parse()
        .map_err(|_| CatalogueSeedingError::InvalidPrice {
            part_number: seed.part_number.clone(),
            value: seed.price.clone(),
        })?;
    let product = NewProduct {
        name: seed.name.clone(),
        part_number: seed.part_number.clone(),
        description: seed.description.clone(),
        category: seed.category.clone(),
        price,
        stock: seed.stock,
        image_url: seed.image_url.clone(),
        compatible_models: seed.compatible_models.clone(),
    };
    product
        .validate()
        .map_err(|source| CatalogueSeedingError::InvalidProduct {
            part_number: seed.part_number.clone(),
            source,
        })?;
    Ok(product)
}

/// Insert every product of `set`, skipping part numbers already present.
///
/// The whole set is converted before the first write, so a malformed entry
/// leaves the catalogue untouched.
pub async fn seed_product_set(
    storage: &dyn Storage,
    set: &ProductSet,
) -> Result<SeedOutcome, CatalogueSeedingError> {
    let products = set
        .products()
        .iter()
        .map(to_new_product)
        .collect::<Result<Vec<_>, _>>()?;

    let mut outcome = SeedOutcome {
        set_name: set.name().to_owned(),
        inserted: 0,
        skipped: 0,
    };
    for product in &products {
        match storage.create_product(product).await {
            Ok(_) => outcome.inserted += 1,
            Err(StorageError::Conflict { .. }) => {
                debug!(part_number = %product.part_number, "product already seeded");
                outcome.skipped += 1;
            }
            Err(error) => return Err(error.into()),
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use catalogue_seed::CatalogueRegistry;

    use super::*;
    use crate::outbound::InMemoryStorage;

    const REGISTRY: &str = r#"{
        "version": 1,
        "sets": [{
            "name": "brakes-only",
            "products": [
                {"name": "Pastiglie Freno Anteriori YZF-R1", "partNumber": "4C8-W0045-00",
                 "category": "brakes", "price": "89.99", "stock": 28},
                {"name": "Disco Freno Anteriore Destro MT-09", "partNumber": "1RC-2582W-00",
                 "category": "brakes", "price": "178.00", "stock": 6}
            ]
        }]
    }"#;

    fn brakes() -> ProductSet {
        CatalogueRegistry::from_json(REGISTRY)
            .expect("registry")
            .find_set("brakes-only")
            .expect("set")
            .clone()
    }

    #[tokio::test]
    async fn seeding_twice_skips_existing_part_numbers() {
        let storage = InMemoryStorage::new();
        let set = brakes();

        let first = seed_product_set(&storage, &set).await.expect("first run");
        assert_eq!((first.inserted, first.skipped), (2, 0));

        let second = seed_product_set(&storage, &set).await.expect("second run");
        assert_eq!((second.inserted, second.skipped), (0, 2));
        assert_eq!(storage.list_products().await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn prices_keep_their_cents() {
        let storage = InMemoryStorage::new();
        seed_product_set(&storage, &brakes()).await.expect("seed");

        let products = storage
            .list_products_by_category("brakes")
            .await
            .expect("list");
        let pads = products
            .iter()
            .find(|p| p.part_number == "4C8-W0045-00")
            .expect("pads");
        assert_eq!(pads.price, Decimal::new(8_999, 2));
    }

    #[test]
    fn zero_stock_is_allowed() {
        let seed = ProductSeed {
            name: "Frizione Completa Tenere 700".to_owned(),
            part_number: "3B6-16321-10".to_owned(),
            description: String::new(),
            category: "transmission".to_owned(),
            price: "267.00".to_owned(),
            stock: 0,
            image_url: None,
            compatible_models: vec!["Tenere 700 2019-2023".to_owned()],
        };
        let product = to_new_product(&seed).expect("valid product");
        assert_eq!(product.stock, 0);
    }
}
