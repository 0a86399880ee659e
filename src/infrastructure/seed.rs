use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{
    AddressInput, CreateCollectionInput, CreateCustomerInput, CreateOrderInput,
    CreateProductInput, CreatePromotionInput, DomainError, NewOrderItem, UpdateCollectionInput,
};
use crate::infrastructure::AppState;
use crate::models::Membership;

const DEMO_EMAIL: &str = "martin@example.com";

/// Populate a small demo catalog. Does nothing when the demo customer already exists.
pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    if state.customer_repo.find_by_email(DEMO_EMAIL).await?.is_some() {
        tracing::info!("Demo data already present, skipping");
        return Ok(());
    }

    // 1. Catalog
    let bakery = state
        .collection_repo
        .create(CreateCollectionInput {
            title: "Bakery".to_owned(),
            featured_product_id: None,
        })
        .await?;

    let sourdough = state
        .product_repo
        .create(CreateProductInput {
            title: "Sourdough loaf".to_owned(),
            slug: Some("sourdough-loaf".to_owned()),
            description: "Naturally leavened, 800g.".to_owned(),
            unit_price: Decimal::new(650, 2),
            inventory: 24,
            collection_id: bakery.id,
        })
        .await?;

    let baguette = state
        .product_repo
        .create(CreateProductInput {
            title: "Baguette".to_owned(),
            slug: None,
            description: "Classic French stick.".to_owned(),
            unit_price: Decimal::new(275, 2),
            inventory: 40,
            collection_id: bakery.id,
        })
        .await?;

    state
        .collection_repo
        .update(
            bakery.id,
            UpdateCollectionInput {
                featured_product_id: Some(Some(sourdough.id)),
                ..Default::default()
            },
        )
        .await?;

    // 2. Promotions
    let weekend = state
        .promotion_repo
        .create(CreatePromotionInput {
            description: "Weekend bread sale".to_owned(),
            discount: 10.0,
        })
        .await?;

    for product_id in [sourdough.id, baguette.id] {
        state
            .product_repo
            .add_promotion(product_id, weekend.id)
            .await?;
    }

    // 3. Customer with address
    let customer = state
        .customer_repo
        .create(CreateCustomerInput {
            given_name: "Martin".to_owned(),
            last_name: "Kowalski".to_owned(),
            email: DEMO_EMAIL.to_owned(),
            phone: "+1 555 0100".to_owned(),
            birth_date: NaiveDate::from_ymd_opt(1988, 6, 14),
            membership: Some(Membership::Silver),
        })
        .await?;

    state
        .customer_repo
        .set_address(
            customer.id,
            AddressInput {
                street: "12 Mill Lane".to_owned(),
                city: "Portland".to_owned(),
            },
        )
        .await?;

    // 4. Order and cart
    state
        .order_repo
        .create(CreateOrderInput {
            customer_id: customer.id,
            payment_status: None,
            items: vec![NewOrderItem {
                product_id: sourdough.id,
                quantity: 2,
                unit_price: None,
            }],
        })
        .await?;

    let cart = state.cart_repo.create().await?;
    state.cart_repo.add_item(cart.id, baguette.id, 3).await?;

    tracing::info!("Demo data seeded");
    Ok(())
}
