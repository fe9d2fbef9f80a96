use storefront::domain::types::Checkout;
use storefront::error::StorefrontError;
use storefront::usecase::checkout::{
    AddCheckoutLinesUseCase, CompleteCheckoutUseCase, CreateCheckoutInput, CreateCheckoutUseCase,
    GetCheckoutUseCase, LineInput,
};
use storefront_domain::id::CheckoutId;
use storefront_domain::money::Money;

use crate::helpers::{
    MockCheckoutRepo, MockProductRepo, checkout_settings, line, test_product, test_user,
    test_variant, viewer_for,
};

fn catalog() -> MockProductRepo {
    let product = test_product();
    let first = test_variant(&product, "SKU-A", 9999);
    let second = test_variant(&product, "SKU-B", 500);
    MockProductRepo::new(vec![product], vec![first, second])
}

fn create_usecase(
    products: MockProductRepo,
    checkouts: MockCheckoutRepo,
) -> CreateCheckoutUseCase<MockProductRepo, MockCheckoutRepo> {
    CreateCheckoutUseCase {
        products,
        checkouts,
        settings: checkout_settings(),
    }
}

fn anonymous_input(lines: Vec<LineInput>) -> CreateCheckoutInput {
    CreateCheckoutInput {
        lines,
        email: Some("Customer@Example.com".to_owned()),
        channel: None,
    }
}

// ── CreateCheckoutUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_anonymous_checkout_with_normalized_email() {
    let products = catalog();
    let variant = products.variants[0].clone();
    let checkouts = MockCheckoutRepo::empty();
    let usecase = create_usecase(products, checkouts.clone());

    let checkout = usecase
        .execute(None, anonymous_input(vec![line(&variant, 2)]))
        .await
        .unwrap();

    assert_eq!(checkout.email, "customer@example.com");
    assert_eq!(checkout.user_id, None);
    assert_eq!(checkout.channel, "default-channel");
    assert_eq!(checkout.quantity(), 2);
    assert_eq!(
        checkout.subtotal().unwrap(),
        Money::from_minor_units(19998, "USD")
    );
    assert_eq!(checkouts.stored(checkout.id), Some(checkout));
}

#[tokio::test]
async fn should_merge_duplicate_variants_into_one_line() {
    let products = catalog();
    let variant = products.variants[0].clone();
    let usecase = create_usecase(products, MockCheckoutRepo::empty());

    let checkout = usecase
        .execute(
            None,
            anonymous_input(vec![line(&variant, 2), line(&variant, 3)]),
        )
        .await
        .unwrap();

    assert_eq!(checkout.lines.len(), 1);
    assert_eq!(checkout.lines[0].quantity, 5);
}

#[tokio::test]
async fn should_use_viewer_email_and_ownership_when_logged_in() {
    let user = test_user();
    let viewer = viewer_for(&user);
    let products = catalog();
    let variant = products.variants[1].clone();
    let usecase = create_usecase(products, MockCheckoutRepo::empty());

    let checkout = usecase
        .execute(
            Some(&viewer),
            CreateCheckoutInput {
                lines: vec![line(&variant, 1)],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(checkout.user_id, Some(user.id));
    assert_eq!(checkout.email, user.email);
}

#[tokio::test]
async fn should_require_email_for_anonymous_checkout() {
    let products = catalog();
    let variant = products.variants[0].clone();
    let checkouts = MockCheckoutRepo::empty();
    let usecase = create_usecase(products, checkouts.clone());

    let result = usecase
        .execute(
            None,
            CreateCheckoutInput {
                lines: vec![line(&variant, 1)],
                email: Some("   ".to_owned()),
                channel: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(StorefrontError::EmailRequired)),
        "expected EmailRequired, got {result:?}"
    );
    assert!(checkouts.checkouts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_malformed_email() {
    let products = catalog();
    let variant = products.variants[0].clone();
    let usecase = create_usecase(products, MockCheckoutRepo::empty());

    let result = usecase
        .execute(
            None,
            CreateCheckoutInput {
                lines: vec![line(&variant, 1)],
                email: Some("not-an-email".to_owned()),
                channel: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(StorefrontError::InvalidEmail)),
        "expected InvalidEmail, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_channel() {
    let products = catalog();
    let variant = products.variants[0].clone();
    let usecase = create_usecase(products, MockCheckoutRepo::empty());

    let mut input = anonymous_input(vec![line(&variant, 1)]);
    input.channel = Some("other-channel".to_owned());
    let result = usecase.execute(None, input).await;

    assert!(
        matches!(result, Err(StorefrontError::ChannelNotFound)),
        "expected ChannelNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_non_positive_quantity() {
    let products = catalog();
    let variant = products.variants[0].clone();
    let usecase = create_usecase(products, MockCheckoutRepo::empty());

    for quantity in [0, -1] {
        let result = usecase
            .execute(None, anonymous_input(vec![line(&variant, quantity)]))
            .await;
        assert!(
            matches!(result, Err(StorefrontError::ZeroQuantity)),
            "quantity {quantity}: expected ZeroQuantity, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_quantity_above_limit() {
    let products = catalog();
    let variant = products.variants[0].clone();
    let usecase = create_usecase(products, MockCheckoutRepo::empty());

    let result = usecase
        .execute(None, anonymous_input(vec![line(&variant, 51)]))
        .await;
    assert!(
        matches!(
            result,
            Err(StorefrontError::QuantityGreaterThanLimit { max: 50 })
        ),
        "expected QuantityGreaterThanLimit, got {result:?}"
    );

    let merged = usecase
        .execute(
            None,
            anonymous_input(vec![line(&variant, 30), line(&variant, 30)]),
        )
        .await;
    assert!(
        matches!(merged, Err(StorefrontError::QuantityGreaterThanLimit { .. })),
        "expected merged lines to exceed the limit, got {merged:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_or_malformed_variant() {
    let usecase = create_usecase(catalog(), MockCheckoutRepo::empty());
    let stranger = test_variant(&test_product(), "SKU-X", 100);

    for variant_id in [stranger.id.to_string(), "not-a-uuid".to_owned()] {
        let result = usecase
            .execute(
                None,
                anonymous_input(vec![LineInput {
                    variant_id: variant_id.clone(),
                    quantity: 1,
                }]),
            )
            .await;
        assert!(
            matches!(result, Err(StorefrontError::VariantNotFound)),
            "{variant_id}: expected VariantNotFound, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_report_unknown_variant_before_merged_limit() {
    let usecase = create_usecase(catalog(), MockCheckoutRepo::empty());
    let stranger = test_variant(&test_product(), "SKU-X", 100);

    let result = usecase
        .execute(
            None,
            anonymous_input(vec![line(&stranger, 30), line(&stranger, 30)]),
        )
        .await;
    assert!(
        matches!(result, Err(StorefrontError::VariantNotFound)),
        "expected VariantNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_merged_quantity_that_overflows() {
    let products = catalog();
    let variant = products.variants[0].clone();
    let mut settings = checkout_settings();
    settings.max_line_quantity = u32::MAX;
    let usecase = CreateCheckoutUseCase {
        products,
        checkouts: MockCheckoutRepo::empty(),
        settings,
    };

    let result = usecase
        .execute(
            None,
            anonymous_input(vec![line(&variant, i32::MAX); 3]),
        )
        .await;
    assert!(
        matches!(result, Err(StorefrontError::QuantityGreaterThanLimit { .. })),
        "expected QuantityGreaterThanLimit, got {result:?}"
    );
}

// ── AddCheckoutLinesUseCase ──────────────────────────────────────────────────

async fn seeded_checkout(
    products: &MockProductRepo,
    checkouts: &MockCheckoutRepo,
    viewer: Option<&storefront::domain::types::Viewer>,
) -> Checkout {
    let variant = products.variants[0].clone();
    create_usecase(products.clone(), checkouts.clone())
        .execute(viewer, anonymous_input(vec![line(&variant, 1)]))
        .await
        .unwrap()
}

#[tokio::test]
async fn should_add_lines_merging_existing_variant() {
    let products = catalog();
    let checkouts = MockCheckoutRepo::empty();
    let checkout = seeded_checkout(&products, &checkouts, None).await;
    let (first, second) = (products.variants[0].clone(), products.variants[1].clone());

    let usecase = AddCheckoutLinesUseCase {
        products,
        checkouts: checkouts.clone(),
        settings: checkout_settings(),
    };
    let updated = usecase
        .execute(
            None,
            &checkout.id.to_string(),
            &[line(&first, 2), line(&second, 1)],
        )
        .await
        .unwrap();

    assert_eq!(updated.lines.len(), 2);
    let quantity_of = |id| {
        updated
            .lines
            .iter()
            .find(|l| l.variant.id == id)
            .map(|l| l.quantity)
    };
    assert_eq!(quantity_of(first.id), Some(3));
    assert_eq!(quantity_of(second.id), Some(1));
    assert_eq!(updated.lines[0].variant.id, first.id);
    assert_eq!(checkouts.stored(checkout.id).unwrap().lines, updated.lines);
}

#[tokio::test]
async fn should_reject_added_quantity_that_exceeds_limit() {
    let products = catalog();
    let checkouts = MockCheckoutRepo::empty();
    let checkout = seeded_checkout(&products, &checkouts, None).await;
    let variant = products.variants[0].clone();

    let usecase = AddCheckoutLinesUseCase {
        products,
        checkouts: checkouts.clone(),
        settings: checkout_settings(),
    };
    let result = usecase
        .execute(None, &checkout.id.to_string(), &[line(&variant, 50)])
        .await;

    assert!(
        matches!(result, Err(StorefrontError::QuantityGreaterThanLimit { .. })),
        "expected QuantityGreaterThanLimit, got {result:?}"
    );
    assert_eq!(checkouts.stored(checkout.id).unwrap().quantity(), 1);
}

#[tokio::test]
async fn should_hide_owned_checkout_from_other_callers() {
    let owner = test_user();
    let products = catalog();
    let checkouts = MockCheckoutRepo::empty();
    let checkout = seeded_checkout(&products, &checkouts, Some(&viewer_for(&owner))).await;
    let variant = products.variants[1].clone();

    let usecase = AddCheckoutLinesUseCase {
        products,
        checkouts,
        settings: checkout_settings(),
    };
    let result = usecase
        .execute(None, &checkout.id.to_string(), &[line(&variant, 1)])
        .await;

    assert!(
        matches!(result, Err(StorefrontError::CheckoutNotFound)),
        "expected CheckoutNotFound, got {result:?}"
    );
}

// ── GetCheckoutUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_checkout_only_to_its_owner() {
    let owner = test_user();
    let mut stranger = test_user();
    stranger.id = storefront_domain::id::UserId::generate();
    let products = catalog();
    let checkouts = MockCheckoutRepo::empty();
    let checkout = seeded_checkout(&products, &checkouts, Some(&viewer_for(&owner))).await;
    let id = checkout.id.to_string();

    let usecase = GetCheckoutUseCase { checkouts };
    assert_eq!(
        usecase.execute(Some(&viewer_for(&owner)), &id).await.unwrap(),
        Some(checkout)
    );
    assert_eq!(
        usecase.execute(Some(&viewer_for(&stranger)), &id).await.unwrap(),
        None
    );
    assert_eq!(usecase.execute(None, &id).await.unwrap(), None);
}

#[tokio::test]
async fn should_return_none_for_unknown_or_malformed_checkout_id() {
    let usecase = GetCheckoutUseCase {
        checkouts: MockCheckoutRepo::empty(),
    };

    let missing = CheckoutId::generate().to_string();
    assert_eq!(usecase.execute(None, &missing).await.unwrap(), None);
    assert_eq!(usecase.execute(None, "garbage").await.unwrap(), None);
}

// ── CompleteCheckoutUseCase ──────────────────────────────────────────────────

#[tokio::test]
async fn should_place_order_and_remove_checkout() {
    let products = catalog();
    let checkouts = MockCheckoutRepo::empty();
    let variant = products.variants[0].clone();
    let checkout = create_usecase(products.clone(), checkouts.clone())
        .execute(None, anonymous_input(vec![line(&variant, 2)]))
        .await
        .unwrap();

    let usecase = CompleteCheckoutUseCase {
        products,
        checkouts: checkouts.clone(),
    };
    let order = usecase
        .execute(None, &checkout.id.to_string())
        .await
        .unwrap();

    assert_eq!(order.status.as_str(), "UNFULFILLED");
    assert_eq!(order.user_email, "customer@example.com");
    assert_eq!(order.total, Money::from_minor_units(19998, "USD"));
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].product_name, "Test Product");
    assert_eq!(order.lines[0].variant_sku, "SKU-A");
    assert_eq!(order.lines[0].quantity, 2);
    assert_eq!(checkouts.stored(checkout.id), None);
    assert_eq!(checkouts.orders.lock().unwrap().len(), 1);

    let again = usecase.execute(None, &checkout.id.to_string()).await;
    assert!(
        matches!(again, Err(StorefrontError::CheckoutNotFound)),
        "expected CheckoutNotFound on second completion, got {again:?}"
    );
}

#[tokio::test]
async fn should_refuse_to_complete_empty_checkout() {
    let products = catalog();
    let checkouts = MockCheckoutRepo::empty();
    let checkout = create_usecase(products.clone(), checkouts.clone())
        .execute(None, anonymous_input(vec![]))
        .await
        .unwrap();

    let usecase = CompleteCheckoutUseCase {
        products,
        checkouts: checkouts.clone(),
    };
    let result = usecase.execute(None, &checkout.id.to_string()).await;

    assert!(
        matches!(result, Err(StorefrontError::NoLines)),
        "expected NoLines, got {result:?}"
    );
    assert!(checkouts.stored(checkout.id).is_some());
    assert!(checkouts.orders.lock().unwrap().is_empty());
}
