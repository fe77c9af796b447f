use draftsync_diff::{
    DiffIssue, ProductDiffContext, VariantProblem, build_asset_actions, build_attribute_actions,
    build_change_master_variant_actions, build_image_actions, build_price_actions,
    build_product_actions, build_variants_actions,
};
use draftsync_types::{
    Asset, Image, LocalizedString, Money, Price, Product, ProductAction, ProductDraft,
    ProductVariant, ProductVariantDraft, ResourceId, ResourceIdentifier,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn en(text: &str) -> LocalizedString {
    LocalizedString::of("en", text)
}

fn variant(key: &str) -> ProductVariantDraft {
    ProductVariantDraft::new(key).with_sku(format!("sku-{key}"))
}

fn product(master: ProductVariantDraft, variants: Vec<ProductVariantDraft>) -> ProductDraft {
    let mut draft = ProductDraft::new("p1", en("Shoe"), en("shoe")).with_master_variant(master);
    for v in variants {
        draft = draft.with_variant(v);
    }
    draft
}

fn existing(draft: &ProductDraft) -> Product {
    Product::from_draft(ResourceId::new(), draft)
}

fn stored(id: u32, draft: ProductVariantDraft) -> ProductVariant {
    ProductVariant::from_draft(id, &draft)
}

// ── List reconciliation ──────────────────────────────────────────

#[test]
fn removed_and_added_variants() {
    let old = existing(&product(variant("m1"), vec![variant("v2"), variant("v3")]));
    let new = product(variant("m1"), vec![variant("v3"), variant("v4")]);

    let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
    assert!(outcome.issues.is_empty());
    assert_eq!(
        outcome.actions,
        vec![
            ProductAction::RemoveVariant { variant_id: 2 },
            ProductAction::AddVariant {
                key: Some("v4".to_string()),
                sku: Some("sku-v4".to_string()),
                attributes: Default::default(),
                prices: vec![],
                images: vec![],
                assets: vec![],
            },
        ]
    );
}

#[test]
fn promoted_variant_replaces_old_master() {
    let old = existing(&product(variant("m1"), vec![variant("v2")]));
    let new = product(variant("v2"), vec![]);

    let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
    assert_eq!(
        outcome.actions,
        vec![
            ProductAction::ChangeMasterVariant {
                sku: "sku-v2".to_string()
            },
            ProductAction::RemoveVariant { variant_id: 1 },
        ]
    );
}

#[test]
fn demoted_master_is_kept() {
    let old = existing(&product(variant("m1"), vec![variant("v2")]));
    let new = product(variant("v2"), vec![variant("m1")]);

    let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
    assert_eq!(
        outcome.actions,
        vec![ProductAction::ChangeMasterVariant {
            sku: "sku-v2".to_string()
        }]
    );
}

#[test]
fn new_master_without_sku_is_added_but_not_promoted() {
    let old = existing(&product(variant("m1"), vec![]));
    let new = product(ProductVariantDraft::new("fresh"), vec![]);

    let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
    let names: Vec<_> = outcome.actions.iter().map(ProductAction::name).collect();
    assert_eq!(names, vec!["addVariant"]);
    assert_eq!(
        outcome.issues,
        vec![DiffIssue {
            product_key: "p1".to_string(),
            problem: VariantProblem::BlankNewMasterSku,
        }]
    );
}

#[test]
fn blank_old_master_key_aborts_variant_diff() {
    let mut old = existing(&product(variant("m1"), vec![variant("v2")]));
    old.master_variant.key = None;
    let new = product(variant("m1"), vec![variant("v3")]);

    let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
    assert!(outcome.actions.is_empty());
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(
        outcome.issues[0].to_string(),
        "Failed to build variants update actions on the product with key 'p1'. \
         Reason: Old master variant key is blank."
    );
}

#[test]
fn missing_new_master_aborts_variant_diff() {
    let old = existing(&product(variant("m1"), vec![]));
    let mut new = product(variant("m1"), vec![]);
    new.master_variant = None;

    let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
    assert!(outcome.actions.is_empty());
    assert_eq!(outcome.issues[0].problem, VariantProblem::BlankNewMasterKey);
}

#[test]
fn both_blank_masters_are_reported() {
    let mut old = existing(&product(variant("m1"), vec![variant("v2")]));
    old.master_variant.key = Some("  ".to_string());
    let mut new = product(variant("m1"), vec![variant("v3")]);
    new.master_variant = None;

    let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
    assert!(outcome.actions.is_empty());
    let problems: Vec<_> = outcome.issues.iter().map(|i| i.problem.clone()).collect();
    assert_eq!(
        problems,
        vec![VariantProblem::BlankOldMasterKey, VariantProblem::BlankNewMasterKey]
    );
}

#[test]
fn null_and_keyless_variants_are_reported_and_skipped() {
    let old = existing(&product(variant("m1"), vec![]));
    let mut new = product(variant("m1"), vec![]);
    new.variants = vec![
        None,
        Some(ProductVariantDraft::default().with_sku("no-key")),
        Some(variant("v2")),
    ];

    let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
    let problems: Vec<_> = outcome.issues.iter().map(|i| i.problem.clone()).collect();
    assert_eq!(
        problems,
        vec![VariantProblem::NullVariant, VariantProblem::BlankVariantKey]
    );
    let names: Vec<_> = outcome.actions.iter().map(ProductAction::name).collect();
    assert_eq!(names, vec!["addVariant"]);
}

#[test]
fn master_change_helper_ignores_equal_keys() {
    let d = product(variant("m1"), vec![]);
    assert_eq!(build_change_master_variant_actions(&existing(&d), &d), Ok(vec![]));
}

#[test]
fn product_diff_surfaces_variant_issues() {
    let old = existing(&product(variant("m1"), vec![]));
    let mut new = product(variant("m1"), vec![]);
    new.variants.push(None);
    new.name = en("Boot");

    let outcome = build_product_actions(&old, &new, &ProductDiffContext::default());
    assert_eq!(outcome.actions, vec![ProductAction::ChangeName { name: en("Boot") }]);
    assert_eq!(outcome.issues.len(), 1);
}

// ── Attributes ───────────────────────────────────────────────────

#[test]
fn attributes_unset_then_set() {
    let old = stored(
        1,
        variant("m1")
            .with_attribute("color", json!("red"))
            .with_attribute("size", json!(42)),
    );
    let new = variant("m1")
        .with_attribute("color", json!("blue"))
        .with_attribute("size", json!(42))
        .with_attribute("weight", json!(300));

    let mut with_removed = new.clone();
    with_removed.attributes.remove("size");

    assert_eq!(
        build_attribute_actions(&old, &new, &ProductDiffContext::default()),
        vec![
            ProductAction::SetAttribute {
                variant_id: 1,
                name: "color".to_string(),
                value: Some(json!("blue")),
            },
            ProductAction::SetAttribute {
                variant_id: 1,
                name: "weight".to_string(),
                value: Some(json!(300)),
            },
        ]
    );
    let names: Vec<_> = build_attribute_actions(&old, &with_removed, &ProductDiffContext::default())
        .into_iter()
        .filter_map(|a| match a {
            ProductAction::SetAttribute { name, value: None, .. } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["size".to_string()]);
}

#[test]
fn same_for_all_attribute_is_sent_once() {
    let old = existing(&product(
        variant("m1").with_attribute("brand", json!("acme")),
        vec![variant("v2").with_attribute("brand", json!("acme"))],
    ));
    let new = product(
        variant("m1").with_attribute("brand", json!("globex")),
        vec![variant("v2").with_attribute("brand", json!("globex"))],
    );
    let ctx = ProductDiffContext {
        same_for_all_attributes: ["brand".to_string()].into(),
        ..ProductDiffContext::default()
    };

    let outcome = build_variants_actions(&old, &new, &ctx);
    assert_eq!(
        outcome.actions,
        vec![ProductAction::SetAttributeInAllVariants {
            name: "brand".to_string(),
            value: Some(json!("globex")),
        }]
    );
}

// ── Images ───────────────────────────────────────────────────────

#[test]
fn images_removed_added_and_reordered() {
    let old = stored(
        1,
        variant("m1")
            .with_image(Image::of("a.png"))
            .with_image(Image::of("b.png"))
            .with_image(Image::of("c.png")),
    );
    let new = variant("m1")
        .with_image(Image::of("c.png"))
        .with_image(Image::of("a.png"))
        .with_image(Image::of("d.png"));

    assert_eq!(
        build_image_actions(&old, &new),
        vec![
            ProductAction::RemoveImage {
                variant_id: 1,
                image_url: "b.png".to_string(),
            },
            ProductAction::AddExternalImage {
                variant_id: 1,
                image: Image::of("d.png"),
            },
            ProductAction::MoveImageToPosition {
                variant_id: 1,
                image_url: "c.png".to_string(),
                position: 0,
            },
        ]
    );
}

#[test]
fn image_label_change_keeps_image() {
    let old = stored(1, variant("m1").with_image(Image::of("a.png")));
    let mut labelled = Image::of("a.png");
    labelled.label = Some("front".to_string());
    let new = variant("m1").with_image(labelled);

    assert_eq!(
        build_image_actions(&old, &new),
        vec![ProductAction::SetImageLabel {
            variant_id: 1,
            image_url: "a.png".to_string(),
            label: Some("front".to_string()),
        }]
    );
}

// ── Prices ───────────────────────────────────────────────────────

#[test]
fn prices_matched_by_scope() {
    let old = stored(
        1,
        variant("m1")
            .with_price(Price::of(Money::of(100, "EUR")).with_id("p-eur"))
            .with_price(Price::of(Money::of(200, "USD")).with_id("p-usd")),
    );
    let new = variant("m1")
        .with_price(Price::of(Money::of(150, "EUR")))
        .with_price(Price::of(Money::of(300, "GBP")));

    assert_eq!(
        build_price_actions(&old, &new),
        vec![
            ProductAction::RemovePrice {
                price_id: "p-usd".to_string()
            },
            ProductAction::ChangePrice {
                price_id: "p-eur".to_string(),
                price: Price::of(Money::of(150, "EUR")),
            },
            ProductAction::AddPrice {
                variant_id: 1,
                price: Price::of(Money::of(300, "GBP")),
            },
        ]
    );
}

#[test]
fn country_makes_a_distinct_price_scope() {
    let old = stored(
        1,
        variant("m1").with_price(Price::of(Money::of(100, "EUR")).with_id("p-1")),
    );
    let new = variant("m1")
        .with_price(Price::of(Money::of(100, "EUR")))
        .with_price(Price::of(Money::of(90, "EUR")).with_country("DE"));

    let names: Vec<_> = build_price_actions(&old, &new)
        .iter()
        .map(ProductAction::name)
        .collect();
    assert_eq!(names, vec!["addPrice"]);
}

#[test]
fn price_references_match_by_id_or_key() {
    let old = stored(
        1,
        variant("m1").with_price(
            Price::of(Money::of(100, "EUR"))
                .with_id("price-1")
                .with_channel(ResourceIdentifier::of_id_and_key("ch-1", "berlin"))
                .with_customer_group(ResourceIdentifier::of_id_and_key("g-1", "vip")),
        ),
    );
    let new = variant("m1").with_price(
        Price::of(Money::of(100, "EUR"))
            .with_channel(ResourceIdentifier::of_id("ch-1"))
            .with_customer_group(ResourceIdentifier::of_key("vip")),
    );

    assert!(build_price_actions(&old, &new).is_empty());
}

#[test]
fn price_with_changed_value_under_key_reference_is_changed_in_place() {
    let old = stored(
        1,
        variant("m1").with_price(
            Price::of(Money::of(100, "EUR"))
                .with_id("price-1")
                .with_channel(ResourceIdentifier::of_id_and_key("ch-1", "berlin")),
        ),
    );
    let price = Price::of(Money::of(120, "EUR")).with_channel(ResourceIdentifier::of_key("berlin"));
    let new = variant("m1").with_price(price.clone());

    assert_eq!(
        build_price_actions(&old, &new),
        vec![ProductAction::ChangePrice {
            price_id: "price-1".to_string(),
            price,
        }]
    );
}

// ── Assets ───────────────────────────────────────────────────────

#[test]
fn assets_removed_renamed_and_added() {
    let old = stored(
        1,
        variant("m1")
            .with_asset(Asset::of("a1", en("Manual")))
            .with_asset(Asset::of("a2", en("Datasheet"))),
    );
    let new = variant("m1")
        .with_asset(Asset::of("a2", en("Data sheet")))
        .with_asset(Asset::of("a3", en("Video")).with_source("https://cdn/video.mp4"));

    assert_eq!(
        build_asset_actions(&old, &new),
        vec![
            ProductAction::RemoveAsset {
                variant_id: 1,
                asset_key: "a1".to_string(),
            },
            ProductAction::ChangeAssetName {
                variant_id: 1,
                asset_key: "a2".to_string(),
                name: en("Data sheet"),
            },
            ProductAction::AddAsset {
                variant_id: 1,
                asset: Asset::of("a3", en("Video")).with_source("https://cdn/video.mp4"),
                position: 1,
            },
        ]
    );
}

#[test]
fn asset_order_fixed_with_one_action() {
    let old = stored(
        1,
        variant("m1")
            .with_asset(Asset::of("a1", en("Manual")))
            .with_asset(Asset::of("a2", en("Datasheet"))),
    );
    let new = variant("m1")
        .with_asset(Asset::of("a2", en("Datasheet")))
        .with_asset(Asset::of("a1", en("Manual")));

    assert_eq!(
        build_asset_actions(&old, &new),
        vec![ProductAction::ChangeAssetOrder {
            variant_id: 1,
            asset_order: vec!["a2".to_string(), "a1".to_string()],
        }]
    );
}

#[test]
fn keyless_assets_are_ignored() {
    let old = stored(1, variant("m1"));
    let mut keyless = Asset::of("tmp", en("Loose"));
    keyless.key = None;
    let new = variant("m1").with_asset(keyless);

    assert!(build_asset_actions(&old, &new).is_empty());
}

#[test]
fn keyless_asset_does_not_shift_insert_positions() {
    let old = stored(1, variant("m1").with_asset(Asset::of("a1", en("Manual"))));
    let mut keyless = Asset::of("tmp", en("Loose"));
    keyless.key = None;
    let new = variant("m1")
        .with_asset(keyless)
        .with_asset(Asset::of("a1", en("Manual")))
        .with_asset(Asset::of("a2", en("Datasheet")));

    assert_eq!(
        build_asset_actions(&old, &new),
        vec![ProductAction::AddAsset {
            variant_id: 1,
            asset: Asset::of("a2", en("Datasheet")),
            position: 1,
        }]
    );
}
