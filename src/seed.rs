use crate::{
    models::{NewProduct, NewUser},
    state::AppState,
};

/// Inserts a small demo catalog and two users through the store handles.
pub async fn seed_demo_data(state: &AppState) -> anyhow::Result<()> {
    let users = [
        ("Ferris", "ferris@example.com", "1 Crab Lane"),
        ("Corro", "corro@example.com", "42 Unsafe Street"),
    ];
    for (name, email, address) in users {
        let user = state
            .users
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                address: address.to_string(),
            })
            .await?;
        tracing::info!(user_id = user.id, email, "seeded user");
    }

    let catalog = [
        (
            "Rustacean Wear",
            vec![("Axum Hoodie", 50, 550_000), ("Ferris Cap", 80, 150_000)],
        ),
        (
            "Oxidized Goods",
            vec![("Ferris Mug", 100, 120_000), ("Sticker Pack", 200, 50_000)],
        ),
    ];
    for (brand_name, products) in catalog {
        let brand = state.catalog.create_brand(brand_name.to_string()).await?;
        for (name, qty, price) in products {
            let product = state
                .catalog
                .create_product(NewProduct {
                    brand_id: brand.id,
                    name: name.to_string(),
                    qty,
                    price,
                })
                .await?;
            tracing::info!(product_id = product.id, brand_id = brand.id, name, "seeded product");
        }
    }

    Ok(())
}
