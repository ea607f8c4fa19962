//! Lazy cursors over paged listings.
//!
//! A listing endpoint returns one [`Page`] per round trip. [`paginate`] turns a request plus a
//! fetch closure into a forward-only stream of items: it fetches a page, stops when the page is
//! empty or carries no continuation, otherwise yields the items in server order, stores the
//! continuation on the request, and fetches again. Each call starts from the request as given;
//! streams are not resumable.

// crates.io
use futures::{Stream, TryStreamExt, stream};
// self
use crate::{
	_prelude::*,
	obs::{self, RequestKind, RequestOutcome},
};

/// Where the next page starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Continuation {
	/// Opaque token echoed by the server (`pageToken`).
	Token(String),
	/// Zero-based page index (`page`).
	Index(u32),
}

/// Items of one page plus the continuation for the next, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageParts<T> {
	/// Items in server order.
	pub items: Vec<T>,
	/// Continuation for the next page; `None` ends the listing.
	pub next: Option<Continuation>,
}
impl<T> PageParts<T> {
	/// Token-paged listing; an absent or empty token ends it.
	pub fn from_token(items: Vec<T>, next_page_token: Option<String>) -> Self {
		let next = next_page_token.filter(|token| !token.is_empty()).map(Continuation::Token);

		Self { items, next }
	}

	/// Index-paged listing; a page shorter than `page_size` ends it.
	pub fn from_index(items: Vec<T>, page: u32, page_size: u32) -> Self {
		let full = page_size > 0 && items.len() >= page_size as usize;
		let next = full.then(|| page.checked_add(1).map(Continuation::Index)).flatten();

		Self { items, next }
	}
}

/// Response of a listing endpoint.
pub trait Page {
	/// Listed item type.
	type Item;

	/// Splits the page into its items and continuation.
	fn into_parts(self) -> PageParts<Self::Item>;
}

/// Listing request whose continuation field can be updated between fetches.
pub trait PagedRequest {
	/// Points the request at the page described by `next`.
	fn set_continuation(&mut self, next: &Continuation);
}

/// Generic token-paged response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPage<T> {
	/// Items of this page.
	#[serde(default)]
	pub items: Vec<T>,
	/// Token for the next page; absent or empty on the last page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next_page_token: Option<String>,
	/// Total number of items across all pages, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_size: Option<u64>,
}
impl<T> Page for TokenPage<T> {
	type Item = T;

	fn into_parts(self) -> PageParts<T> {
		PageParts::from_token(self.items, self.next_page_token)
	}
}

/// Generic index-paged response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPage<T> {
	/// Items of this page.
	#[serde(default)]
	pub items: Vec<T>,
	/// Zero-based index of this page.
	#[serde(default)]
	pub page: u32,
	/// Requested page size.
	#[serde(default)]
	pub page_size: u32,
	/// Total number of items across all pages.
	#[serde(default)]
	pub count: u64,
}
impl<T> Page for IndexPage<T> {
	type Item = T;

	fn into_parts(self) -> PageParts<T> {
		PageParts::from_index(self.items, self.page, self.page_size)
	}
}

struct Cursor<Req, F> {
	request: Req,
	fetch: F,
	exhausted: bool,
}

/// Fetches only the first page of a listing.
pub async fn first_page<Req, P, F, Fut>(request: Req, mut fetch: F) -> Result<PageParts<P::Item>>
where
	P: Page,
	F: FnMut(Req) -> Fut,
	Fut: Future<Output = Result<P>>,
{
	fetch(request).await.map(Page::into_parts)
}

/// Streams every item of a listing, fetching pages on demand.
///
/// `fetch` receives a copy of the request for each page. An error is yielded once and ends
/// the stream.
pub fn paginate<Req, P, F, Fut>(request: Req, fetch: F) -> impl Stream<Item = Result<P::Item>>
where
	Req: Clone + PagedRequest,
	P: Page,
	F: FnMut(Req) -> Fut,
	Fut: Future<Output = Result<P>>,
{
	let cursor = Cursor { request, fetch, exhausted: false };

	stream::try_unfold(cursor, |mut cursor| async move {
		if cursor.exhausted {
			return Ok(None);
		}

		obs::record_request_outcome(RequestKind::Page, RequestOutcome::Attempt);

		let page = match (cursor.fetch)(cursor.request.clone()).await {
			Ok(page) => page,
			Err(err) => {
				obs::record_request_outcome(RequestKind::Page, RequestOutcome::Failure);

				return Err(err);
			},
		};

		obs::record_request_outcome(RequestKind::Page, RequestOutcome::Success);

		let PageParts { items, next } = page.into_parts();

		if items.is_empty() {
			return Ok(None);
		}

		match next {
			Some(next) => cursor.request.set_continuation(&next),
			None => cursor.exhausted = true,
		}

		Ok(Some((stream::iter(items.into_iter().map(Ok::<P::Item, Error>)), cursor)))
	})
	.try_flatten()
}
