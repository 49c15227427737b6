mod common;

use common::{harness_with, seed_users, views_harness};
use serde_json::json;

#[tokio::test]
async fn product_index_lists_every_category() {
    let h = views_harness().await;

    h.client
        .get("/products")
        .await
        .assert_status(200)
        .assert_header("Content-Type", "text/html; charset=utf-8")
        .assert_see("<h2><a href=\"/products/phones\">phones</a></h2>")
        .assert_see("<a href=\"/products/phones?id=2\">iPhone 15</a>")
        .assert_see("<a href=\"/products/laptops?id=1\">ThinkPad</a>");
}

#[tokio::test]
async fn category_and_product_pages() {
    let h = views_harness().await;

    h.client
        .get("/products/laptops")
        .await
        .assert_status(200)
        .assert_see("ThinkPad");

    h.client
        .get("/products/phones?id=1")
        .await
        .assert_status(200)
        .assert_see("<h1>Pixel 8</h1>")
        .assert_see("<dt>price</dt><dd>699</dd>");
}

#[tokio::test]
async fn page_errors_keep_their_status() {
    let h = views_harness().await;

    h.client
        .get("/products/boats")
        .await
        .assert_status(400)
        .assert_see("Invalid product type:boats");
    h.client
        .get("/products/boats?id=abc")
        .await
        .assert_status(400)
        .assert_see("Invalid product type:boats");
    h.client
        .get("/products/phones?id=abc")
        .await
        .assert_status(400)
        .assert_see("Invalid id:abc");
    h.client
        .get("/products/phones?id=42")
        .await
        .assert_status(404)
        .assert_see("No product with id:42 found");
}

#[tokio::test]
async fn new_product_form_targets_the_selected_category() {
    let h = views_harness().await;

    h.client
        .get("/new")
        .await
        .assert_status(200)
        .assert_see("action=\"/api/products/phones\"")
        .assert_see("<a href=\"/new?type=laptops\">laptops</a>");

    h.client
        .get("/new?type=laptops")
        .await
        .assert_status(200)
        .assert_see("action=\"/api/products/laptops\"");

    h.client.get("/new?type=boats").await.assert_status(400);
}

#[tokio::test]
async fn form_post_redirects_to_the_new_product() {
    let h = views_harness().await;

    h.client
        .post_form("/api/products/phones", &[("name", "Fairphone 5")])
        .await
        .assert_status(302)
        .assert_header("Location", "/products/phones?id=3");

    h.client
        .get("/products/phones?id=3")
        .await
        .assert_status(200)
        .assert_see("Fairphone 5");
}

#[tokio::test]
async fn category_names_are_percent_encoded_in_links() {
    let h = harness_with(
        seed_users(),
        json!({"home goods": [{"id": 1, "name": "Lamp"}]}),
        true,
    )
    .await;

    h.client
        .get("/products")
        .await
        .assert_status(200)
        .assert_see("<h2><a href=\"/products/home%20goods\">home goods</a></h2>")
        .assert_see("<a href=\"/products/home%20goods?id=1\">Lamp</a>")
        .assert_see("<a href=\"/new?type=home%20goods\">Add to home goods</a>");

    h.client
        .get("/new?type=home%20goods")
        .await
        .assert_status(200)
        .assert_see("action=\"/api/products/home%20goods\"");

    h.client
        .post_form("/api/products/home%20goods", &[("name", "Rug")])
        .await
        .assert_status(302)
        .assert_header("Location", "/products/home%20goods?id=2");

    h.client
        .get("/products/home%20goods?id=2")
        .await
        .assert_status(200)
        .assert_see("<h1>Rug</h1>")
        .assert_see("<a href=\"/products/home%20goods\">All home goods</a>");
}

#[tokio::test]
async fn json_post_still_returns_the_record() {
    let h = views_harness().await;

    h.client
        .post_json("/api/products/laptops", json!({"name": "XPS"}))
        .await
        .assert_status(201)
        .assert_json(json!({"id": 2, "name": "XPS"}));
}

#[tokio::test]
async fn interpolated_values_are_escaped() {
    let h = views_harness().await;

    h.client
        .post_json("/api/products/phones", json!({"name": "<script>x</script>"}))
        .await
        .assert_status(201);

    let page = h.client.get("/products/phones?id=3").await.assert_status(200);
    assert!(!page.text().contains("<script>"));
    assert!(page.text().contains("&lt;script&gt;x&lt;/script&gt;"));
}
