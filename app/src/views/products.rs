//! HTML pages over the product catalog

use depot::error::FrameworkError;
use depot::http::parse_id;
use depot::store::Record;
use depot::routing::encode_component;
use depot::view::{escape, Page};
use depot::{Request, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::state::AppState;

#[derive(Deserialize)]
struct ShowQuery {
    id: Option<String>,
}

#[derive(Deserialize)]
struct CreateQuery {
    #[serde(rename = "type")]
    category: Option<String>,
}

/// Form fields offered on the new-product page
const FORM_FIELDS: &[(&str, &str)] = &[
    ("name", "text"),
    ("price", "number"),
    ("description", "text"),
];

fn render(result: Result<Page, FrameworkError>) -> Response {
    match result {
        Ok(page) => page.into_response(),
        Err(err) => Page::error(&err).into_response(),
    }
}

/// GET /products
pub async fn index(req: Request) -> Response {
    render(index_page(&req).await)
}

/// GET /products/{type}, or one product with `?id=`
pub async fn show(req: Request) -> Response {
    render(show_page(&req).await)
}

/// GET /new
pub async fn create(req: Request) -> Response {
    render(create_page(&req).await)
}

async fn index_page(req: &Request) -> Result<Page, FrameworkError> {
    let state = req.state::<AppState>()?;

    let mut body = String::from("<h1>Products</h1>\n");
    for category in state.products.categories().await {
        let products = state.products.list(&category).await?;
        body.push_str(&category_section(&category, &products));
    }

    Ok(Page::new("Products").body(body))
}

async fn show_page(req: &Request) -> Result<Page, FrameworkError> {
    let state = req.state::<AppState>()?;
    let category = req.param("type")?.to_string();
    let query: ShowQuery = req.query()?;

    match query.id {
        Some(raw) => {
            state.products.check_scope(&category).await?;
            let id = parse_id(&raw)?;
            let product = state.products.show(&category, id).await?;
            Ok(product_page(&category, &product))
        }
        None => {
            let products = state.products.list(&category).await?;
            Ok(Page::new(category.clone()).body(category_section(&category, &products)))
        }
    }
}

async fn create_page(req: &Request) -> Result<Page, FrameworkError> {
    let state = req.state::<AppState>()?;
    let query: CreateQuery = req.query()?;
    let categories = state.products.categories().await;

    let selected = match query.category {
        Some(category) if categories.contains(&category) => category,
        Some(category) => return Err(FrameworkError::invalid_category(category)),
        None => match categories.first() {
            Some(first) => first.clone(),
            None => {
                return Ok(Page::new("New product")
                    .body("<h1>New product</h1>\n<p>There are no categories to add to.</p>"))
            }
        },
    };

    let switcher: Vec<String> = categories
        .iter()
        .map(|c| {
            if *c == selected {
                format!("<strong>{}</strong>", escape(c))
            } else {
                format!("<a href=\"/new?type={}\">{}</a>", href(c), escape(c))
            }
        })
        .collect();

    let inputs: String = FORM_FIELDS
        .iter()
        .map(|(name, kind)| {
            format!(
                "        <label>{0} <input type=\"{1}\" name=\"{0}\"></label>\n",
                name, kind
            )
        })
        .collect();

    let body = format!(
        "<h1>New product in {0}</h1>\n<p>Category: {1}</p>\n\
         <form method=\"post\" action=\"/api/products/{3}\">\n{2}        <button type=\"submit\">Add</button>\n</form>",
        escape(&selected),
        switcher.join(" | "),
        inputs,
        href(&selected)
    );

    Ok(Page::new("New product").body(body))
}

fn product_page(category: &str, product: &Record) -> Page {
    let fields: String = product
        .iter()
        .map(|(key, value)| {
            format!(
                "    <dt>{}</dt><dd>{}</dd>\n",
                escape(key),
                escape(&display(value))
            )
        })
        .collect();

    let title = title(product);
    let body = format!(
        "<h1>{}</h1>\n<dl>\n{}</dl>\n<p><a href=\"/products/{}\">All {}</a></p>",
        escape(&title),
        fields,
        href(category),
        escape(category)
    );

    Page::new(title).body(body)
}

fn category_section(category: &str, products: &[Record]) -> String {
    let items: String = products
        .iter()
        .map(|product| {
            let id = product.get("id").map(display).unwrap_or_default();
            format!(
                "    <li><a href=\"/products/{}?id={}\">{}</a></li>\n",
                href(category),
                href(&id),
                escape(&title(product))
            )
        })
        .collect();

    let list = if items.is_empty() {
        "<p>No products yet.</p>".to_string()
    } else {
        format!("<ul>\n{}</ul>", items)
    };

    format!(
        "<section>\n<h2><a href=\"/products/{0}\">{1}</a></h2>\n{2}\n<p><a href=\"/new?type={0}\">Add to {1}</a></p>\n</section>\n",
        href(category),
        escape(category),
        list
    )
}

/// A URL component, escaped for a double-quoted attribute
fn href(raw: &str) -> String {
    escape(&encode_component(raw))
}

/// A product's name, or "Product {id}" when it has none
fn title(product: &Record) -> String {
    match product.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => format!(
            "Product {}",
            product.get("id").map(display).unwrap_or_default()
        ),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
