//! Eligibility and price resolution tests

use pricetag::{
    fixtures::{department, history, product, product_rule, sale, with_item},
    prelude::*,
};
use smallvec::smallvec;
use testresult::TestResult;

fn campaign(discount: &str) -> Result<SaleSnapshot, DiscountError> {
    let mut sale = sale(1);
    sale.discount = DiscountAmount::parse_stored(Some(discount))?;

    let mut snapshot = SaleSnapshot::new(sale);
    snapshot.products = vec![product_rule(1, SaleRule::Include)];

    Ok(snapshot)
}

fn sell(
    snapshot: &SaleSnapshot,
    product: &ProductSnapshot,
    mode: CheckMode,
) -> Option<SaleResolution> {
    resolve(snapshot, product, TransactionKind::Sell, mode)
}

#[test]
fn exclude_rule_beats_department_include() -> TestResult {
    let mut snapshot = campaign("80%")?;
    snapshot.products = vec![
        product_rule(7, SaleRule::Include),
        product_rule(1, SaleRule::Exclude),
    ];
    snapshot.departments = smallvec![department(Some(10), None, SaleRule::Include)];

    let excluded = with_item(product(1, 1000), Some(10), Some(20));
    let sibling = with_item(product(2, 1000), Some(10), Some(20));

    assert_eq!(sell(&snapshot, &excluded, CheckMode::PreCheck), None);
    assert!(
        sell(&snapshot, &sibling, CheckMode::PreCheck).is_some(),
        "department include still applies to other products"
    );

    Ok(())
}

#[test]
fn empty_discount_never_applies() -> TestResult {
    let mut snapshot = campaign("")?;
    snapshot.departments = smallvec![department(None, None, SaleRule::Include)];

    for id in 1..=3 {
        let product = with_item(product(id, 1000), Some(1), Some(1));

        assert_eq!(sell(&snapshot, &product, CheckMode::PreCheck), None);
        assert_eq!(sell(&snapshot, &product, CheckMode::PostCheck), None);
    }

    Ok(())
}

#[test]
fn percentage_is_the_charged_share_of_the_price() -> TestResult {
    let resolution = sell(&campaign("80%")?, &product(1, 1000), CheckMode::PreCheck)
        .ok_or("sale should apply")?;

    assert_eq!(resolution.price.result_price, 800);
    assert_eq!(resolution.price.discount_price, -200);

    Ok(())
}

#[test]
fn absolute_amount_is_added_to_the_price() -> TestResult {
    let resolution = sell(&campaign("-150")?, &product(1, 1000), CheckMode::PreCheck)
        .ok_or("sale should apply")?;

    assert_eq!(resolution.price.result_price, 850);
    assert_eq!(resolution.price.discount_price, -150);

    Ok(())
}

#[test]
fn global_cap_boundary_differs_between_check_modes() -> TestResult {
    let mut snapshot = campaign("80%")?;
    snapshot.sale.total_item_limit = Some(10);
    snapshot.history = vec![history(1, 6), history(2, 4)];

    assert_eq!(sell(&snapshot, &product(1, 1000), CheckMode::PreCheck), None);

    let post = sell(&snapshot, &product(1, 1000), CheckMode::PostCheck)
        .ok_or("post-check should accept")?;

    assert_eq!(post.allowed_item_count, AllowedCount::Limited(0));

    Ok(())
}

#[test]
fn unit_cap_tightens_global_remaining() -> TestResult {
    let mut snapshot = campaign("80%")?;
    snapshot.sale.total_item_limit = Some(10);
    snapshot.sale.unit_item_limit = Some(4);
    snapshot.history = vec![history(1, 2), history(2, 3)];

    let resolution = sell(&snapshot, &product(1, 1000), CheckMode::PreCheck)
        .ok_or("sale should apply")?;

    assert_eq!(resolution.allowed_item_count, AllowedCount::Limited(2));

    Ok(())
}

#[test]
fn override_price_is_discounted_instead_of_base() -> TestResult {
    let mut item = product(1, 1000);
    item.specific_sell_price = Some(600);

    let resolution =
        sell(&campaign("50%")?, &item, CheckMode::PreCheck).ok_or("sale should apply")?;

    assert_eq!(resolution.price.original_price, 600);
    assert_eq!(resolution.price.result_price, 300);

    Ok(())
}
