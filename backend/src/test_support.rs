//! Test utilities for the storefront crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! Production code reads files through `cap_std::fs::Dir`; tests write
    //! their key files and registries the same way.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write bytes to a file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use storefront::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("registry.json");
    /// write_file(&path, b"{}\n")?;
    /// assert_eq!(read_file_to_string(&path)?, "{}\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Read a UTF-8 text file through `cap_std`.
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod fixtures {
    //! Catalogue and cart builders shared by unit and integration tests.

    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::ports::{Storage, StorageError};
    use crate::domain::{
        CartItem, CartItemId, CartItemWithProduct, NewProduct, Product, ProductId, UserId,
    };
    use crate::outbound::InMemoryStorage;

    /// Subject used by the development identity provider.
    pub const RIDER: &str = "dev-rider";

    /// Unsaved product priced in cents.
    pub fn new_product(
        name: &str,
        part_number: &str,
        category: &str,
        cents: i64,
        stock: u32,
    ) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            part_number: part_number.to_owned(),
            description: format!("Ricambio originale Yamaha: {name}"),
            category: category.to_owned(),
            price: Decimal::new(cents, 2),
            stock,
            image_url: None,
            compatible_models: vec!["MT-07".to_owned(), "Tracer 7".to_owned()],
        }
    }

    /// Stored-looking product with a fresh id.
    pub fn product(name: &str, category: &str, cents: i64, stock: u32) -> Product {
        let part_number = format!("TST-{}", name.len());
        let draft = new_product(name, &part_number, category, cents, stock);
        Product {
            id: ProductId::random(),
            name: draft.name,
            part_number: draft.part_number,
            description: draft.description,
            category: draft.category,
            price: draft.price,
            stock: draft.stock,
            image_url: draft.image_url,
            compatible_models: draft.compatible_models,
            created_at: Utc::now(),
        }
    }

    /// Cart line for the development rider.
    ///
    /// # Panics
    /// Never in practice; the rider id is a valid constant.
    pub fn cart_line(product: Product, quantity: u32) -> CartItemWithProduct {
        let now = Utc::now();
        let user_id = match UserId::new(RIDER) {
            Ok(id) => id,
            Err(error) => panic!("fixture rider id rejected: {error}"),
        };
        CartItemWithProduct {
            item: CartItem {
                id: CartItemId::random(),
                user_id,
                product_id: product.id,
                quantity,
                created_at: now,
                updated_at: now,
            },
            product,
        }
    }

    /// The four-category sample catalogue used across suites.
    pub fn sample_catalogue() -> Vec<NewProduct> {
        vec![
            new_product("Kit Pistone", "2C0-11631-00", "engine", 18_999, 8),
            new_product("Pastiglie Freno Anteriori", "5VU-W0045-00", "brakes", 4_599, 25),
            new_product("Kit Catena", "94580-52116", "transmission", 12_500, 0),
            new_product("Batteria YTZ10S", "YTZ10S-BS", "electrical", 14_999, 14),
        ]
    }

    /// In-memory storage pre-loaded with `products`.
    ///
    /// # Errors
    /// Propagates storage failures, for example duplicate part numbers.
    pub async fn seeded_storage(products: &[NewProduct]) -> Result<InMemoryStorage, StorageError> {
        let storage = InMemoryStorage::new();
        for product in products {
            storage.create_product(product).await?;
        }
        Ok(storage)
    }
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.
    //!
    //! Resolves `RefOr<Schema>` wrappers to concrete `Object` schemas with
    //! diagnostic messages on type mismatches.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic if not an Object.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            RefOr::T(Schema::AllOf(_)) => {
                panic!("schema '{name}' is an AllOf combinator; inspect composed schemas");
            }
            RefOr::T(Schema::Array(_)) => {
                panic!("schema '{name}' is an Array, not an Object");
            }
            _ => panic!("schema '{name}' has unexpected type"),
        }
    }

    /// Get a property from an Object schema by name.
    ///
    /// Panics if the property does not exist.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}
