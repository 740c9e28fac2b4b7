//! GraphQL operations for the BigCommerce Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`], paired with
//! a module holding its `Variables` and `ResponseData`, the same layout
//! `#[derive(GraphQLQuery)]` generates.

use graphql_client::{GraphQLQuery, QueryBody};

/// Define an operation struct bound to its document and snake-case module.
macro_rules! operation {
    ($name:ident, $module:ident, $document:expr) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

// =============================================================================
// Fragments
// =============================================================================

macro_rules! product_option_fields {
    () => {
        r"
fragment ProductOptionFields on CatalogProductOption {
  __typename
  entityId
  displayName
  isVariantOption
  ... on MultipleChoiceOption {
    values(first: 50) {
      edges {
        node {
          entityId
          label
          isDefault
        }
      }
    }
  }
}
"
    };
}

macro_rules! product_card_fields {
    () => {
        r"
fragment ProductCardFields on Product {
  entityId
  name
  path
  prices {
    price {
      value
      currencyCode
    }
  }
  defaultImage {
    urlOriginal
    altText
  }
}
"
    };
}

macro_rules! cart_fields {
    () => {
        r"
fragment CartFields on Cart {
  entityId
  currencyCode
  amount {
    value
    currencyCode
  }
  lineItems {
    physicalItems {
      entityId
      productEntityId
      name
      quantity
    }
    digitalItems {
      entityId
      productEntityId
      name
      quantity
    }
  }
}
"
    };
}

macro_rules! wishlist_fields {
    () => {
        r"
fragment WishlistFields on Wishlist {
  entityId
  name
  isPublic
  token
  items {
    edges {
      node {
        entityId
        productEntityId
        product {
          name
        }
      }
    }
  }
}
"
    };
}

macro_rules! address_fields {
    () => {
        r"
fragment OrderAddressFields on OrderAddress {
  firstName
  lastName
  address1
  address2
  city
  email
  phone
  postalCode
  company
  country
  stateOrProvince
}
"
    };
}

// =============================================================================
// Orders
// =============================================================================

operation!(
    GetOrder,
    get_order,
    concat!(
        r"
query GetOrder($filter: OrderFilterInput!) {
  site {
    order(filter: $filter) {
      entityId
      orderedAt { utc }
      updatedAt { utc }
      status { value }
      subTotal { value currencyCode }
      totalIncTax { value currencyCode }
      consignments {
        shipping(first: 10) {
          edges {
            node {
              shippingCost { value currencyCode }
              handlingCost { value currencyCode }
              lineItems(first: 10) {
                edges {
                  node {
                    productEntityId
                    entityId
                    quantity
                    name
                    image { urlOriginal }
                    productOptions { name value }
                    subTotalSalePrice { value currencyCode }
                  }
                }
              }
              shippingAddress { ...OrderAddressFields }
            }
          }
        }
      }
      billingAddress { ...OrderAddressFields }
    }
  }
}
",
        address_fields!()
    )
);

pub mod get_order {
    use cove_core::OrderId;
    use serde::{Deserialize, Serialize};

    use crate::bigcommerce::types::Order;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub filter: OrderFilter,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderFilter {
        pub entity_id: OrderId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub site: Site,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Site {
        pub order: Option<Order>,
    }
}

operation!(
    GetCustomerOrders,
    get_customer_orders,
    r"
query GetCustomerOrders($after: String, $first: Int) {
  customer {
    orders(after: $after, first: $first) {
      pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
      edges {
        node {
          entityId
          orderedAt { utc }
          updatedAt { utc }
          status { value }
          subTotal { value currencyCode }
          consignments {
            shipping(first: 10) {
              edges {
                node {
                  lineItems(first: 10) {
                    edges {
                      node {
                        productEntityId
                        entityId
                        quantity
                        name
                        image { urlOriginal }
                      }
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"
);

pub mod get_customer_orders {
    use serde::{Deserialize, Serialize};

    use crate::bigcommerce::types::{Connection, Order};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub after: Option<String>,
        pub first: Option<i64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<Customer>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Customer {
        pub orders: Option<Connection<Order>>,
    }
}

// =============================================================================
// Products
// =============================================================================

operation!(
    GetProductOptions,
    get_product_options,
    concat!(
        r"
query GetProductOptions($productIds: [Int!]!) {
  site {
    products(entityIds: $productIds, first: 50) {
      edges {
        node {
          entityId
          name
          productOptions(first: 50) {
            edges {
              node { ...ProductOptionFields }
            }
          }
        }
      }
    }
  }
}
",
        product_option_fields!()
    )
);

pub mod get_product_options {
    use cove_core::ProductId;
    use serde::{Deserialize, Serialize};

    use crate::bigcommerce::types::{Connection, Product};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_ids: Vec<ProductId>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub site: Site,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Site {
        pub products: Option<Connection<Product>>,
    }
}

operation!(
    GetProduct,
    get_product,
    concat!(
        r"
query GetProduct($entityId: Int!) {
  site {
    product(entityId: $entityId) {
      ...ProductCardFields
      productOptions(first: 50) {
        edges {
          node { ...ProductOptionFields }
        }
      }
    }
  }
}
",
        product_card_fields!(),
        product_option_fields!()
    )
);

pub mod get_product {
    use cove_core::ProductId;
    use serde::{Deserialize, Serialize};

    use crate::bigcommerce::types::Product;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub entity_id: ProductId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub site: Site,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Site {
        pub product: Option<Product>,
    }
}

operation!(
    GetProductsByIds,
    get_products_by_ids,
    concat!(
        r"
query GetProductsByIds($productIds: [Int!]!, $first: Int) {
  site {
    products(entityIds: $productIds, first: $first) {
      edges {
        node { ...ProductCardFields }
      }
    }
  }
}
",
        product_card_fields!()
    )
);

pub mod get_products_by_ids {
    use cove_core::ProductId;
    use serde::{Deserialize, Serialize};

    use crate::bigcommerce::types::{Connection, Product};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_ids: Vec<ProductId>,
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub site: Site,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Site {
        pub products: Option<Connection<Product>>,
    }
}

operation!(
    AddProductReview,
    add_product_review,
    r"
mutation AddProductReview(
  $input: ProductReviewInput!
  $productEntityId: Long!
  $reCaptchaV2: ReCaptchaV2Input
) {
  catalog {
    addProductReview(
      input: { review: $input, productEntityId: $productEntityId }
      reCaptchaV2: $reCaptchaV2
    ) {
      errors {
        __typename
        ... on CustomerAlreadyReviewedProductError { message }
        ... on NotAuthorizedToAddProductReviewError { message }
        ... on ProductIdNotFoundError { message }
        ... on InvalidInputFieldsError { message fields }
        ... on UnexpectedAddReviewError { message }
      }
    }
  }
}
"
);

pub mod add_product_review {
    use cove_core::ProductId;
    use serde::{Deserialize, Serialize};

    use crate::bigcommerce::api::ReviewInput;
    use crate::bigcommerce::types::ReviewError;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub input: ReviewInput,
        pub product_entity_id: ProductId,
        #[serde(rename = "reCaptchaV2", skip_serializing_if = "Option::is_none")]
        pub re_captcha_v2: Option<ReCaptchaV2Input>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ReCaptchaV2Input {
        pub token: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub catalog: Option<Catalog>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Catalog {
        pub add_product_review: Option<AddProductReviewResult>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct AddProductReviewResult {
        #[serde(default)]
        pub errors: Vec<ReviewError>,
    }
}

// =============================================================================
// Cart
// =============================================================================

operation!(
    GetCart,
    get_cart,
    concat!(
        r"
query GetCart($cartId: String) {
  site {
    cart(entityId: $cartId) { ...CartFields }
  }
}
",
        cart_fields!()
    )
);

pub mod get_cart {
    use cove_core::CartId;
    use serde::{Deserialize, Serialize};

    use crate::bigcommerce::types::Cart;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub site: Site,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Site {
        pub cart: Option<Cart>,
    }
}

/// Cart line item inputs shared by the create and add mutations.
pub mod cart_input {
    use cove_core::{OptionId, OptionValueId, ProductId};
    use serde::Serialize;

    use crate::bigcommerce::api::CartLineItemInput;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LineItem {
        pub quantity: u32,
        pub product_entity_id: ProductId,
        pub selected_options: SelectedOptions,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SelectedOptions {
        pub multiple_choices: Vec<MultipleChoice>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MultipleChoice {
        pub option_entity_id: OptionId,
        pub option_value_entity_id: OptionValueId,
    }

    impl From<&CartLineItemInput> for LineItem {
        fn from(input: &CartLineItemInput) -> Self {
            Self {
                quantity: input.quantity,
                product_entity_id: input.product_id,
                selected_options: SelectedOptions {
                    multiple_choices: input
                        .selected_options
                        .iter()
                        .map(|s| MultipleChoice {
                            option_entity_id: s.option_id,
                            option_value_entity_id: s.value_id,
                        })
                        .collect(),
                },
            }
        }
    }
}

operation!(
    CreateCart,
    create_cart,
    concat!(
        r"
mutation CreateCart($createCartInput: CreateCartInput!) {
  cart {
    createCart(input: $createCartInput) {
      cart { ...CartFields }
    }
  }
}
",
        cart_fields!()
    )
);

pub mod create_cart {
    use serde::{Deserialize, Serialize};

    use super::cart_input::LineItem;
    use crate::bigcommerce::types::Cart;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub create_cart_input: CreateCartInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateCartInput {
        pub line_items: Vec<LineItem>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartMutations>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartMutations {
        pub create_cart: Option<CartPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CartPayload {
        pub cart: Option<Cart>,
    }
}

operation!(
    AddCartLineItems,
    add_cart_line_items,
    concat!(
        r"
mutation AddCartLineItems($addCartLineItemsInput: AddCartLineItemsInput!) {
  cart {
    addCartLineItems(input: $addCartLineItemsInput) {
      cart { ...CartFields }
    }
  }
}
",
        cart_fields!()
    )
);

pub mod add_cart_line_items {
    use cove_core::CartId;
    use serde::{Deserialize, Serialize};

    use super::cart_input::LineItem;
    use crate::bigcommerce::types::Cart;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub add_cart_line_items_input: AddCartLineItemsInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AddCartLineItemsInput {
        pub cart_entity_id: CartId,
        pub data: AddCartLineItemsData,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AddCartLineItemsData {
        pub line_items: Vec<LineItem>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartMutations>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartMutations {
        pub add_cart_line_items: Option<CartPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CartPayload {
        pub cart: Option<Cart>,
    }
}

// =============================================================================
// Wishlists
// =============================================================================

operation!(
    GetWishlists,
    get_wishlists,
    concat!(
        r"
query GetWishlists($first: Int, $last: Int, $after: String, $before: String) {
  customer {
    wishlists(first: $first, last: $last, after: $after, before: $before) {
      pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
      edges {
        node { ...WishlistFields }
      }
    }
  }
}
",
        wishlist_fields!()
    )
);

pub mod get_wishlists {
    use serde::Deserialize;

    use crate::bigcommerce::api::PageRequest;
    use crate::bigcommerce::types::{Connection, Wishlist};

    pub type Variables = PageRequest;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<Customer>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Customer {
        pub wishlists: Option<Connection<Wishlist>>,
    }
}

/// Response envelope shared by the wishlist mutations that return a wishlist.
pub mod wishlist_payload {
    use serde::Deserialize;

    use crate::bigcommerce::types::Wishlist;

    #[derive(Debug, Clone, Deserialize)]
    pub struct WishlistResult {
        pub result: Option<Wishlist>,
    }
}

operation!(
    CreateWishlist,
    create_wishlist,
    concat!(
        r"
mutation CreateWishlist($input: CreateWishlistInput!) {
  wishlist {
    createWishlist(input: $input) {
      result { ...WishlistFields }
    }
  }
}
",
        wishlist_fields!()
    )
);

pub mod create_wishlist {
    use serde::{Deserialize, Serialize};

    use super::wishlist_payload::WishlistResult;
    use crate::bigcommerce::api::WishlistInput;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: WishlistInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub wishlist: Option<WishlistMutations>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WishlistMutations {
        pub create_wishlist: Option<WishlistResult>,
    }
}

operation!(
    UpdateWishlist,
    update_wishlist,
    concat!(
        r"
mutation UpdateWishlist($input: UpdateWishlistInput!) {
  wishlist {
    updateWishlist(input: $input) {
      result { ...WishlistFields }
    }
  }
}
",
        wishlist_fields!()
    )
);

pub mod update_wishlist {
    use cove_core::WishlistId;
    use serde::{Deserialize, Serialize};

    use super::wishlist_payload::WishlistResult;
    use crate::bigcommerce::api::WishlistInput;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: UpdateWishlistInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateWishlistInput {
        pub entity_id: WishlistId,
        pub data: WishlistInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub wishlist: Option<WishlistMutations>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WishlistMutations {
        pub update_wishlist: Option<WishlistResult>,
    }
}

operation!(
    DeleteWishlists,
    delete_wishlists,
    r"
mutation DeleteWishlists($input: DeleteWishlistsInput!) {
  wishlist {
    deleteWishlists(input: $input) {
      result
    }
  }
}
"
);

pub mod delete_wishlists {
    use cove_core::WishlistId;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: DeleteWishlistsInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DeleteWishlistsInput {
        pub entity_ids: Vec<WishlistId>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub wishlist: Option<WishlistMutations>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WishlistMutations {
        pub delete_wishlists: Option<DeleteResult>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DeleteResult {
        pub result: Option<String>,
    }
}

operation!(
    AddWishlistItems,
    add_wishlist_items,
    concat!(
        r"
mutation AddWishlistItems($input: AddWishlistItemsInput!) {
  wishlist {
    addWishlistItems(input: $input) {
      result { ...WishlistFields }
    }
  }
}
",
        wishlist_fields!()
    )
);

pub mod add_wishlist_items {
    use cove_core::{ProductId, WishlistId};
    use serde::{Deserialize, Serialize};

    use super::wishlist_payload::WishlistResult;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: AddWishlistItemsInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AddWishlistItemsInput {
        pub entity_id: WishlistId,
        pub items: Vec<WishlistItemInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WishlistItemInput {
        pub product_entity_id: ProductId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub wishlist: Option<WishlistMutations>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WishlistMutations {
        pub add_wishlist_items: Option<WishlistResult>,
    }
}

operation!(
    DeleteWishlistItems,
    delete_wishlist_items,
    concat!(
        r"
mutation DeleteWishlistItems($input: DeleteWishlistItemsInput!) {
  wishlist {
    deleteWishlistItems(input: $input) {
      result { ...WishlistFields }
    }
  }
}
",
        wishlist_fields!()
    )
);

pub mod delete_wishlist_items {
    use cove_core::{WishlistId, WishlistItemId};
    use serde::{Deserialize, Serialize};

    use super::wishlist_payload::WishlistResult;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: DeleteWishlistItemsInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DeleteWishlistItemsInput {
        pub entity_id: WishlistId,
        pub item_entity_ids: Vec<WishlistItemId>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub wishlist: Option<WishlistMutations>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WishlistMutations {
        pub delete_wishlist_items: Option<WishlistResult>,
    }
}

// =============================================================================
// Authentication
// =============================================================================

operation!(
    Login,
    login,
    r"
mutation Login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    customer {
      entityId
      firstName
      lastName
      email
    }
  }
}
"
);

pub mod login {
    use serde::{Deserialize, Serialize};

    use crate::bigcommerce::types::LoginCustomer;

    /// Holds the plaintext password only for the lifetime of the request body.
    #[derive(Clone, Serialize)]
    pub struct Variables {
        pub email: String,
        pub password: String,
    }

    impl std::fmt::Debug for Variables {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Variables")
                .field("email", &self.email)
                .field("password", &"[REDACTED]")
                .finish()
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub login: Option<LoginResult>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct LoginResult {
        pub customer: Option<LoginCustomer>,
    }
}

operation!(
    Logout,
    logout,
    r"
mutation Logout {
  logout {
    result
  }
}
"
);

pub mod logout {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub logout: Option<LogoutResult>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct LogoutResult {
        pub result: Option<String>,
    }
}
