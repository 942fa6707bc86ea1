//! Mock Notion API for testing.
//!
//! Provides [`MockNotion`], an in-memory [`NotionApi`] with failure
//! injection, so sync logic can be tested without network access.

use std::collections::HashSet;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use r2n_blocks::Block;
use r2n_config::PropertyNames;
use serde_json::{Value, json};

use crate::api::{LIST_PAGE_SIZE, NotionApi};
use crate::error::NotionError;
use crate::properties::{PageProperties, title_of};
use crate::types::{BlockList, ChildBlock, Page};

#[derive(Debug)]
struct MockPage {
    id: String,
    database_id: String,
    properties: Value,
    children: Vec<(String, Value)>,
}

/// In-memory Notion workspace.
///
/// Pages live in databases and hold a flat list of child blocks. Use the
/// builder methods to seed pages and to make specific calls fail.
///
/// # Example
///
/// ```ignore
/// use r2n_notion::{MockNotion, resolve};
///
/// let api = MockNotion::new()
///     .with_page("page-1", "db", "host/readme")
///     .with_children("page-1", 3)
///     .failing_delete("page-1-child-2");
///
/// let resolution = resolve(&api, "db", "Name", "host/readme").unwrap();
/// ```
#[derive(Debug)]
pub struct MockNotion {
    pages: RwLock<Vec<MockPage>>,
    next_id: AtomicUsize,
    list_page_size: usize,
    fail_query: bool,
    fail_create: bool,
    fail_update: bool,
    fail_deletes: HashSet<String>,
    fail_append_call: Option<usize>,
    query_count: AtomicUsize,
    append_calls: RwLock<Vec<usize>>,
    delete_attempts: RwLock<Vec<String>>,
}

impl Default for MockNotion {
    fn default() -> Self {
        Self {
            pages: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            list_page_size: LIST_PAGE_SIZE,
            fail_query: false,
            fail_create: false,
            fail_update: false,
            fail_deletes: HashSet::new(),
            fail_append_call: None,
            query_count: AtomicUsize::new(0),
            append_calls: RwLock::new(Vec::new()),
            delete_attempts: RwLock::new(Vec::new()),
        }
    }
}

fn injected_failure() -> NotionError {
    NotionError::HttpResponse {
        status: 500,
        code: "internal_server_error".to_owned(),
        message: "injected failure".to_owned(),
    }
}

fn not_found(id: &str) -> NotionError {
    NotionError::HttpResponse {
        status: 404,
        code: "object_not_found".to_owned(),
        message: format!("Could not find block with ID: {id}"),
    }
}

impl MockNotion {
    /// Create an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page with the given title to a database.
    ///
    /// The title is stored under the default `Name` property.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, id: &str, database_id: &str, title: &str) -> Self {
        let properties = PageProperties {
            title: title.to_owned(),
            hostname: String::new(),
            commit: String::new(),
        }
        .to_json(&PropertyNames::default());
        self.pages.write().unwrap().push(MockPage {
            id: id.to_owned(),
            database_id: database_id.to_owned(),
            properties,
            children: Vec::new(),
        });
        self
    }

    /// Give a page `count` paragraph children with IDs
    /// `{page_id}-child-1` through `{page_id}-child-{count}`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned or the page doesn't exist.
    #[must_use]
    pub fn with_children(self, page_id: &str, count: usize) -> Self {
        {
            let mut pages = self.pages.write().unwrap();
            let page = pages.iter_mut().find(|p| p.id == page_id).unwrap();
            for i in 1..=count {
                let block = json!({"object": "block", "type": "paragraph", "paragraph": {"rich_text": []}});
                page.children.push((format!("{page_id}-child-{i}"), block));
            }
        }
        self
    }

    /// Return at most `size` children per listing request.
    #[must_use]
    pub fn with_list_page_size(mut self, size: usize) -> Self {
        self.list_page_size = size.max(1);
        self
    }

    /// Make every database query fail.
    #[must_use]
    pub fn failing_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    /// Make page creation fail.
    #[must_use]
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Make property updates fail.
    #[must_use]
    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    /// Make deletion of one block fail.
    #[must_use]
    pub fn failing_delete(mut self, block_id: &str) -> Self {
        self.fail_deletes.insert(block_id.to_owned());
        self
    }

    /// Make the `n`th append request (1-based) fail.
    #[must_use]
    pub fn failing_append_call(mut self, n: usize) -> Self {
        self.fail_append_call = Some(n);
        self
    }

    /// Number of pages in all databases.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }

    /// IDs of all pages, in creation order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn page_ids(&self) -> Vec<String> {
        self.pages
            .read()
            .unwrap()
            .iter()
            .map(|p| p.id.clone())
            .collect()
    }

    /// Current properties of a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn properties(&self, page_id: &str) -> Option<Value> {
        self.pages
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == page_id)
            .map(|p| p.properties.clone())
    }

    /// Current children of a page, as block JSON.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn children(&self, page_id: &str) -> Vec<Value> {
        self.pages
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == page_id)
            .map(|p| p.children.iter().map(|(_, block)| block.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of database queries made.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Sizes of all append requests made, including failed ones.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn append_calls(&self) -> Vec<usize> {
        self.append_calls.read().unwrap().clone()
    }

    /// IDs of all blocks a delete was attempted on, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn delete_attempts(&self) -> Vec<String> {
        self.delete_attempts.read().unwrap().clone()
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{prefix}-{n}")
    }
}

impl NotionApi for MockNotion {
    fn query_by_title(
        &self,
        database_id: &str,
        title_property: &str,
        title: &str,
    ) -> Result<Vec<Page>, NotionError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_query {
            return Err(injected_failure());
        }
        Ok(self
            .pages
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.database_id == database_id)
            .find(|p| title_of(&p.properties, title_property).as_deref() == Some(title))
            .map(|p| Page {
                id: p.id.clone(),
                url: None,
            })
            .into_iter()
            .collect())
    }

    fn create_page(&self, database_id: &str, properties: &Value) -> Result<Page, NotionError> {
        if self.fail_create {
            return Err(injected_failure());
        }
        let id = self.next_id("created");
        self.pages.write().unwrap().push(MockPage {
            id: id.clone(),
            database_id: database_id.to_owned(),
            properties: properties.clone(),
            children: Vec::new(),
        });
        Ok(Page { id, url: None })
    }

    fn update_page_properties(
        &self,
        page_id: &str,
        properties: &Value,
    ) -> Result<Page, NotionError> {
        if self.fail_update {
            return Err(injected_failure());
        }
        let mut pages = self.pages.write().unwrap();
        let page = pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| not_found(page_id))?;
        if let (Some(target), Some(updates)) = (page.properties.as_object_mut(), properties.as_object())
        {
            for (name, value) in updates {
                target.insert(name.clone(), value.clone());
            }
        }
        Ok(Page {
            id: page.id.clone(),
            url: None,
        })
    }

    fn list_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<BlockList, NotionError> {
        let pages = self.pages.read().unwrap();
        let page = pages
            .iter()
            .find(|p| p.id == block_id)
            .ok_or_else(|| not_found(block_id))?;

        let start = match start_cursor {
            Some(cursor) => page
                .children
                .iter()
                .position(|(id, _)| id == cursor)
                .ok_or_else(|| NotionError::HttpResponse {
                    status: 400,
                    code: "validation_error".to_owned(),
                    message: format!("invalid start_cursor: {cursor}"),
                })?,
            None => 0,
        };
        let end = (start + self.list_page_size).min(page.children.len());

        Ok(BlockList {
            results: page.children[start..end]
                .iter()
                .map(|(id, block)| ChildBlock {
                    id: id.clone(),
                    block_type: block["type"].as_str().unwrap_or_default().to_owned(),
                })
                .collect(),
            has_more: end < page.children.len(),
            next_cursor: page.children.get(end).map(|(id, _)| id.clone()),
        })
    }

    fn delete_block(&self, block_id: &str) -> Result<(), NotionError> {
        self.delete_attempts
            .write()
            .unwrap()
            .push(block_id.to_owned());
        if self.fail_deletes.contains(block_id) {
            return Err(injected_failure());
        }
        let mut pages = self.pages.write().unwrap();
        for page in pages.iter_mut() {
            if let Some(pos) = page.children.iter().position(|(id, _)| id == block_id) {
                page.children.remove(pos);
                return Ok(());
            }
        }
        Err(not_found(block_id))
    }

    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<(), NotionError> {
        let call = {
            let mut calls = self.append_calls.write().unwrap();
            calls.push(children.len());
            calls.len()
        };
        if self.fail_append_call == Some(call) {
            return Err(injected_failure());
        }

        let mut values = Vec::with_capacity(children.len());
        for block in children {
            values.push((self.next_id("block"), serde_json::to_value(block)?));
        }

        let mut pages = self.pages.write().unwrap();
        let page = pages
            .iter_mut()
            .find(|p| p.id == block_id)
            .ok_or_else(|| not_found(block_id))?;
        page.children.extend(values);
        Ok(())
    }
}
