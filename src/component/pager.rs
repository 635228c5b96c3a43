//! Pagination widgets

use super::html_tag::escape;
use super::{Component, ComponentBase, Section};
use crate::error::Result;
use crate::grid::GridContext;
use std::fmt::Write as _;

/// Number of page links shown on each side of the current page before
/// the list collapses to edge pages plus an ellipsis.
const PAGE_WINDOW: usize = 3;

/// Page navigation rendered from the provider's pagination state.
///
/// Renders nothing when everything fits on a single page. Page links
/// carry the full current grid state with only the page number
/// replaced.
#[derive(Debug, Default)]
pub struct Pager {
	base: ComponentBase,
}

impl Pager {
	/// Creates a pager
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares the parent section this pager renders in
	pub fn section(mut self, section: Section) -> Self {
		self.base.render_section = Some(section);
		self
	}

	fn page_item(ctx: &GridContext, page: usize, current: usize) -> String {
		if page == current {
			format!("<li class=\"active\"><span>{page}</span></li>")
		} else {
			let href = escape(&ctx.input().url_with_page(page));
			format!("<li><a href=\"{href}\">{page}</a></li>")
		}
	}

	fn pages(current: usize, last: usize) -> Vec<Option<usize>> {
		if last <= 2 * PAGE_WINDOW + 1 {
			return (1..=last).map(Some).collect();
		}
		let low = current.saturating_sub(PAGE_WINDOW).max(1);
		let high = (current + PAGE_WINDOW).min(last);
		let mut out = Vec::new();
		if low > 1 {
			out.push(Some(1));
			if low > 2 {
				out.push(None);
			}
		}
		out.extend((low..=high).map(Some));
		if high < last {
			if high < last - 1 {
				out.push(None);
			}
			out.push(Some(last));
		}
		out
	}
}

impl Component for Pager {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		let paginator = ctx.provider().paginator();
		let last = paginator.last_page();
		if last <= 1 {
			return Ok(String::new());
		}
		let current = paginator.current_page();
		let mut out = String::from("<ul class=\"pagination\">");
		if paginator.has_previous() {
			let href = escape(&ctx.input().url_with_page(current - 1));
			let _ = write!(out, "<li><a href=\"{href}\" rel=\"prev\">&laquo;</a></li>");
		} else {
			out.push_str("<li class=\"disabled\"><span>&laquo;</span></li>");
		}
		for page in Self::pages(current, last) {
			match page {
				Some(page) => out.push_str(&Self::page_item(ctx, page, current)),
				None => out.push_str("<li class=\"disabled\"><span>&hellip;</span></li>"),
			}
		}
		if paginator.has_next() {
			let href = escape(&ctx.input().url_with_page(current + 1));
			let _ = write!(out, "<li><a href=\"{href}\" rel=\"next\">&raquo;</a></li>");
		} else {
			out.push_str("<li class=\"disabled\"><span>&raquo;</span></li>");
		}
		out.push_str("</ul>");
		Ok(out)
	}
}

/// One-line summary of the visible record range.
#[derive(Debug, Default)]
pub struct ShowingRecords {
	base: ComponentBase,
}

impl ShowingRecords {
	/// Creates the summary component
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares the parent section this summary renders in
	pub fn section(mut self, section: Section) -> Self {
		self.base.render_section = Some(section);
		self
	}
}

impl Component for ShowingRecords {
	fn base(&self) -> &ComponentBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut ComponentBase {
		&mut self.base
	}

	fn do_render(&mut self, ctx: &mut GridContext) -> Result<String> {
		let paginator = ctx.provider().paginator();
		let out = match (paginator.first_item(), paginator.last_item()) {
			(Some(from), Some(to)) => format!(
				"<span class=\"showing-records\">Showing records {from}-{to} of {}</span>",
				paginator.total()
			),
			_ => "<span class=\"showing-records\">No records found</span>".to_string(),
		};
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_short_page_list_is_complete() {
		assert_eq!(
			Pager::pages(2, 5),
			vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
		);
	}

	#[test]
	fn test_long_page_list_collapses_edges() {
		let pages = Pager::pages(10, 40);
		assert_eq!(pages.first(), Some(&Some(1)));
		assert_eq!(pages.get(1), Some(&None));
		assert!(pages.contains(&Some(7)));
		assert!(pages.contains(&Some(13)));
		assert_eq!(pages.last(), Some(&Some(40)));
		assert!(!pages.contains(&Some(2)));
	}

	#[test]
	fn test_window_touching_edges_has_no_ellipsis() {
		let pages = Pager::pages(2, 10);
		assert_eq!(pages.first(), Some(&Some(1)));
		assert!(!pages[..6].contains(&None));
	}
}
