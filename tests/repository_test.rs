//! Repository behaviour: validation, defaults, error classification and the
//! delete policies as seen by callers of the domain layer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

use storefront::db;
use storefront::domain::{
    AddressInput, CreateCollectionInput, CreateCustomerInput, CreateOrderInput,
    CreateProductInput, CreatePromotionInput, DomainError, NewOrderItem, UpdateCollectionInput,
    UpdateCustomerInput, UpdateProductInput, UpdatePromotionInput,
};
use storefront::infrastructure::AppState;
use storefront::models::{Membership, PaymentStatus};
use storefront::seed;

// Helper to create a test app state
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn create_collection(state: &AppState, title: &str) -> i32 {
    state
        .collection_repo
        .create(CreateCollectionInput {
            title: title.to_string(),
            featured_product_id: None,
        })
        .await
        .expect("Failed to create collection")
        .id
}

async fn create_product(state: &AppState, collection_id: i32, title: &str, price: &str) -> i32 {
    state
        .product_repo
        .create(CreateProductInput {
            title: title.to_string(),
            slug: None,
            description: String::new(),
            unit_price: dec(price),
            inventory: 5,
            collection_id,
        })
        .await
        .expect("Failed to create product")
        .id
}

fn customer_input(email: &str) -> CreateCustomerInput {
    CreateCustomerInput {
        given_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        phone: "555-0101".to_string(),
        birth_date: None,
        membership: None,
    }
}

#[tokio::test]
async fn test_product_create_defaults_and_price_encoding() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Bakery").await;

    let product = state
        .product_repo
        .create(CreateProductInput {
            title: "Bagel".to_string(),
            slug: None,
            description: "Boiled then baked".to_string(),
            unit_price: dec("1.5"),
            inventory: 12,
            collection_id: col,
        })
        .await
        .unwrap();

    assert_eq!(product.slug, "-");
    assert_eq!(product.unit_price, dec("1.50"));
    assert_eq!(product.unit_price.to_string(), "1.50");

    let by_slug = state.product_repo.find_by_slug("-").await.unwrap();
    assert_eq!(by_slug.len(), 1);
    assert_eq!(by_slug[0].id, product.id);
}

#[tokio::test]
async fn test_product_validation() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Bakery").await;

    let too_precise = state
        .product_repo
        .create(CreateProductInput {
            title: "Bun".to_string(),
            slug: None,
            description: String::new(),
            unit_price: dec("0.999"),
            inventory: 1,
            collection_id: col,
        })
        .await;
    assert!(matches!(too_precise, Err(DomainError::Validation(_))));

    let bad_slug = state
        .product_repo
        .create(CreateProductInput {
            title: "Bun".to_string(),
            slug: Some("hot cross".to_string()),
            description: String::new(),
            unit_price: dec("0.99"),
            inventory: 1,
            collection_id: col,
        })
        .await;
    assert!(matches!(bad_slug, Err(DomainError::Validation(_))));

    let missing_collection = state
        .product_repo
        .create(CreateProductInput {
            title: "Bun".to_string(),
            slug: None,
            description: String::new(),
            unit_price: dec("0.99"),
            inventory: 1,
            collection_id: 4242,
        })
        .await;
    assert!(matches!(missing_collection, Err(DomainError::Validation(_))));

    assert!(state.product_repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_last_update_advances_on_save() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Dairy").await;
    let id = create_product(&state, col, "Milk", "1.20").await;
    let before = state.product_repo.find_by_id(id).await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    let after = state
        .product_repo
        .update(
            id,
            UpdateProductInput {
                inventory: Some(99),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(after.inventory, 99);
    assert!(after.last_update > before.last_update);
}

#[tokio::test]
async fn test_collection_delete_is_protected_by_products() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Bread").await;
    create_product(&state, col, "Rye", "4.00").await;

    let res = state.collection_repo.delete(col).await;
    assert!(matches!(res, Err(DomainError::Protected(_))));

    let empty = create_collection(&state, "Empty").await;
    state.collection_repo.delete(empty).await.unwrap();

    assert!(matches!(
        state.collection_repo.delete(empty).await,
        Err(DomainError::NotFound)
    ));
}

#[tokio::test]
async fn test_featured_product_is_cleared_on_delete() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Pastry").await;
    let eclair = create_product(&state, col, "Eclair", "3.10").await;

    let updated = state
        .collection_repo
        .update(
            col,
            UpdateCollectionInput {
                featured_product_id: Some(Some(eclair)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.featured_product_id, Some(eclair));

    state.product_repo.delete(eclair).await.unwrap();

    let col = state.collection_repo.find_by_id(col).await.unwrap().unwrap();
    assert_eq!(col.featured_product_id, None);
    assert!(state.collection_repo.products(col.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_product_promotions_many_to_many() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Deli").await;
    let ham = create_product(&state, col, "Ham", "6.00").await;
    let salami = create_product(&state, col, "Salami", "7.25").await;

    let summer = state
        .promotion_repo
        .create(CreatePromotionInput {
            description: "Summer".to_string(),
            discount: 0.2,
        })
        .await
        .unwrap();
    let loyalty = state
        .promotion_repo
        .create(CreatePromotionInput {
            description: "Loyalty".to_string(),
            discount: 0.05,
        })
        .await
        .unwrap();

    state.product_repo.add_promotion(ham, summer.id).await.unwrap();
    state.product_repo.add_promotion(ham, summer.id).await.unwrap(); // idempotent
    state.product_repo.add_promotion(ham, loyalty.id).await.unwrap();
    state.product_repo.add_promotion(salami, summer.id).await.unwrap();

    assert_eq!(state.product_repo.promotions(ham).await.unwrap().len(), 2);
    let summer_products = state.promotion_repo.products(summer.id).await.unwrap();
    let mut ids: Vec<i32> = summer_products.iter().map(|p| p.id).collect();
    ids.sort();
    assert_eq!(ids, vec![ham, salami]);

    state.product_repo.remove_promotion(ham, loyalty.id).await.unwrap();
    assert_eq!(state.product_repo.promotions(ham).await.unwrap().len(), 1);
    assert!(matches!(
        state.product_repo.remove_promotion(ham, loyalty.id).await,
        Err(DomainError::NotFound)
    ));
    assert!(matches!(
        state.product_repo.remove_promotion(ham, 9999).await,
        Err(DomainError::NotFound)
    ));

    // deleting a promotion removes links, never products
    state.promotion_repo.delete(summer.id).await.unwrap();
    assert!(state.product_repo.promotions(ham).await.unwrap().is_empty());
    assert_eq!(state.product_repo.find_all().await.unwrap().len(), 2);

    let renamed = state
        .promotion_repo
        .update(
            loyalty.id,
            UpdatePromotionInput {
                description: Some("Members".to_string()),
                discount: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.description, "Members");
    assert_eq!(renamed.discount, 0.05);

    let unknown = state.product_repo.add_promotion(ham, 777).await;
    assert!(matches!(unknown, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let state = setup_test_state().await;
    let first = state
        .customer_repo
        .create(customer_input("ada@example.com"))
        .await
        .unwrap();
    assert_eq!(first.membership, Membership::Bronze);

    let second = state
        .customer_repo
        .create(customer_input("ada@example.com"))
        .await;
    assert!(matches!(second, Err(DomainError::Conflict(_))));

    let other = state
        .customer_repo
        .create(customer_input("charles@example.com"))
        .await
        .unwrap();
    let clash = state
        .customer_repo
        .update(
            other.id,
            UpdateCustomerInput {
                email: Some("ada@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(DomainError::Conflict(_))));

    let invalid = state.customer_repo.create(customer_input("not-an-email")).await;
    assert!(matches!(invalid, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_customer_update_and_lookup() {
    let state = setup_test_state().await;
    let mut input = customer_input("grace@example.com");
    input.birth_date = NaiveDate::from_ymd_opt(1906, 12, 9);
    let created = state.customer_repo.create(input).await.unwrap();
    assert_eq!(created.birth_date, NaiveDate::from_ymd_opt(1906, 12, 9));

    let updated = state
        .customer_repo
        .update(
            created.id,
            UpdateCustomerInput {
                membership: Some(Membership::Gold),
                birth_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.membership, Membership::Gold);
    assert_eq!(updated.birth_date, None);

    let found = state
        .customer_repo
        .find_by_email("grace@example.com")
        .await
        .unwrap()
        .expect("customer should be found by email");
    assert_eq!(found, updated);

    assert!(matches!(
        state
            .customer_repo
            .update(999, UpdateCustomerInput::default())
            .await,
        Err(DomainError::NotFound)
    ));
}

#[tokio::test]
async fn test_address_is_one_to_one_and_cascades() {
    let state = setup_test_state().await;
    let c = state
        .customer_repo
        .create(customer_input("home@example.com"))
        .await
        .unwrap();

    state
        .customer_repo
        .set_address(
            c.id,
            AddressInput {
                street: "1 First St".to_string(),
                city: "Springfield".to_string(),
            },
        )
        .await
        .unwrap();
    let replaced = state
        .customer_repo
        .set_address(
            c.id,
            AddressInput {
                street: "2 Second St".to_string(),
                city: "Shelbyville".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.customer_id, c.id);
    assert_eq!(replaced.street, "2 Second St");

    let missing_customer = state
        .customer_repo
        .set_address(
            999,
            AddressInput {
                street: "Nowhere".to_string(),
                city: "Nowhere".to_string(),
            },
        )
        .await;
    assert!(matches!(missing_customer, Err(DomainError::NotFound)));

    state.customer_repo.delete(c.id).await.unwrap();
    assert!(state.customer_repo.address(c.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_order_lines_freeze_unit_price() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Wine").await;
    let rioja = create_product(&state, col, "Rioja", "15.00").await;
    let c = state
        .customer_repo
        .create(customer_input("wine@example.com"))
        .await
        .unwrap();

    let order = state
        .order_repo
        .create(CreateOrderInput {
            customer_id: c.id,
            payment_status: None,
            items: vec![
                NewOrderItem {
                    product_id: rioja,
                    quantity: 2,
                    unit_price: None,
                },
                NewOrderItem {
                    product_id: rioja,
                    quantity: 1,
                    unit_price: Some(dec("12.00")),
                },
            ],
        })
        .await
        .unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    state
        .product_repo
        .update(
            rioja,
            UpdateProductInput {
                unit_price: Some(dec("18.50")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let items = state.order_repo.items(order.id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].unit_price, dec("15.00"));
    assert_eq!(items[1].unit_price, dec("12.00"));

    // a line added after the change copies the new price
    let late = state
        .order_repo
        .add_item(
            order.id,
            NewOrderItem {
                product_id: rioja,
                quantity: 1,
                unit_price: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(late.unit_price, dec("18.50"));
}

#[tokio::test]
async fn test_order_create_is_atomic() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Tea").await;
    let green = create_product(&state, col, "Green", "3.00").await;
    let c = state
        .customer_repo
        .create(customer_input("tea@example.com"))
        .await
        .unwrap();

    let res = state
        .order_repo
        .create(CreateOrderInput {
            customer_id: c.id,
            payment_status: Some(PaymentStatus::Complete),
            items: vec![
                NewOrderItem {
                    product_id: green,
                    quantity: 1,
                    unit_price: None,
                },
                NewOrderItem {
                    product_id: 31337,
                    quantity: 1,
                    unit_price: None,
                },
            ],
        })
        .await;
    assert!(matches!(res, Err(DomainError::Validation(_))));
    assert!(state.order_repo.find_all().await.unwrap().is_empty());

    let unknown_customer = state
        .order_repo
        .create(CreateOrderInput {
            customer_id: 999,
            payment_status: None,
            items: Vec::new(),
        })
        .await;
    assert!(matches!(unknown_customer, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_order_delete_policies() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Tools").await;
    let hammer = create_product(&state, col, "Hammer", "20.00").await;
    let c = state
        .customer_repo
        .create(customer_input("tools@example.com"))
        .await
        .unwrap();

    let order = state
        .order_repo
        .create(CreateOrderInput {
            customer_id: c.id,
            payment_status: None,
            items: vec![NewOrderItem {
                product_id: hammer,
                quantity: 1,
                unit_price: None,
            }],
        })
        .await
        .unwrap();

    assert!(matches!(
        state.order_repo.delete(order.id).await,
        Err(DomainError::Protected(_))
    ));
    assert!(matches!(
        state.product_repo.delete(hammer).await,
        Err(DomainError::Protected(_))
    ));
    assert!(matches!(
        state.customer_repo.delete(c.id).await,
        Err(DomainError::Protected(_))
    ));

    let placed_at = order.placed_at;
    let paid = state
        .order_repo
        .update_payment_status(order.id, PaymentStatus::Complete)
        .await
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Complete);
    assert_eq!(paid.placed_at, placed_at);

    // once the lines are gone the order can be removed
    for item in state.order_repo.items(order.id).await.unwrap() {
        state.order_repo.remove_item(item.id).await.unwrap();
    }
    state.order_repo.delete(order.id).await.unwrap();
    assert!(state.order_repo.find_by_customer(c.id).await.unwrap().is_empty());
    state.customer_repo.delete(c.id).await.unwrap();
}

#[tokio::test]
async fn test_cart_lines_merge_and_cascade() {
    let state = setup_test_state().await;
    let col = create_collection(&state, "Snacks").await;
    let chips = create_product(&state, col, "Chips", "2.00").await;
    let nuts = create_product(&state, col, "Nuts", "4.00").await;

    let cart = state.cart_repo.create().await.unwrap();
    state.cart_repo.add_item(cart.id, chips, 2).await.unwrap();
    let merged = state.cart_repo.add_item(cart.id, chips, 3).await.unwrap();
    assert_eq!(merged.quantity, 5);

    let nuts_line = state.cart_repo.add_item(cart.id, nuts, 1).await.unwrap();
    let changed = state
        .cart_repo
        .update_item_quantity(nuts_line.id, 7)
        .await
        .unwrap();
    assert_eq!(changed.quantity, 7);

    assert!(matches!(
        state.cart_repo.add_item(cart.id, chips, -1).await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        state.cart_repo.add_item(cart.id, chips, i16::MAX).await,
        Err(DomainError::Validation(_))
    ));

    assert_eq!(state.cart_repo.items(cart.id).await.unwrap().len(), 2);

    // deleting a product drops its cart lines
    state.product_repo.delete(nuts).await.unwrap();
    assert_eq!(state.cart_repo.items(cart.id).await.unwrap().len(), 1);

    state.cart_repo.delete(cart.id).await.unwrap();
    assert!(state.cart_repo.items(cart.id).await.unwrap().is_empty());
    assert!(state.cart_repo.find_by_id(cart.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_items_crud() {
    let state = setup_test_state().await;
    let item = state.item_repo.create("Widget".to_string()).await.unwrap();
    let renamed = state
        .item_repo
        .update(item.id, "Gadget".to_string())
        .await
        .unwrap();
    assert_eq!(renamed.title, "Gadget");
    assert_eq!(state.item_repo.find_all().await.unwrap().len(), 1);

    state.item_repo.delete(item.id).await.unwrap();
    assert!(state.item_repo.find_by_id(item.id).await.unwrap().is_none());
    assert!(matches!(
        state.item_repo.create(String::new()).await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn test_seed_demo_data_is_repeatable() {
    let state = setup_test_state().await;

    seed::seed_demo_data(&state).await.expect("first seed");
    seed::seed_demo_data(&state).await.expect("second seed");

    assert_eq!(state.customer_repo.find_all().await.unwrap().len(), 1);
    assert_eq!(state.product_repo.find_all().await.unwrap().len(), 2);

    let collections = state.collection_repo.find_all().await.unwrap();
    assert_eq!(collections.len(), 1);
    assert!(collections[0].featured_product_id.is_some());

    let customer = &state.customer_repo.find_all().await.unwrap()[0];
    assert!(state.customer_repo.address(customer.id).await.unwrap().is_some());
    assert_eq!(
        state.order_repo.find_by_customer(customer.id).await.unwrap().len(),
        1
    );
}
