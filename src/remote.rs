// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The remote backend: a JSON document store addressed by resource and id.
//!
//! `GET {base}/transactions` lists documents, `PUT`/`DELETE
//! {base}/transactions/{id}` write them; `wages` and `budgets` work the same.

use reqwest::Url;
use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::budget::CategoryBudgets;
use crate::error::{Error, Result};
use crate::models::{Transaction, WageRecord};
use crate::store::Store;

const UA: &str = concat!(
    "worthit/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/worthit)"
);

pub fn http_client() -> Result<Client> {
    let c = Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

#[derive(Debug, Serialize, Deserialize)]
struct BudgetDoc {
    category: String,
    amount: Decimal,
}

pub struct HttpStore {
    client: Client,
    base: Url,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| Error::Config(format!("invalid remote url '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid remote url '{}'", base_url)));
        }
        Ok(Self {
            client: http_client()?,
            base,
        })
    }

    /// Ids are pushed as single path segments, so they are percent-encoded.
    fn url(&self, resource: &str, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    fn get_all<T: for<'de> Deserialize<'de>>(&self, resource: &str) -> Result<Vec<T>> {
        let url = self.url(resource, None);
        debug!("GET {}", url);
        let items = self.client.get(url).send()?.error_for_status()?.json()?;
        Ok(items)
    }

    fn put<T: Serialize>(&self, resource: &str, id: &str, body: &T) -> Result<()> {
        let url = self.url(resource, Some(id));
        debug!("PUT {}", url);
        self.client.put(url).json(body).send()?.error_for_status()?;
        Ok(())
    }

    fn delete(&self, resource: &str, id: &str) -> Result<()> {
        let url = self.url(resource, Some(id));
        debug!("DELETE {}", url);
        let resp = self.client.delete(url).send()?;
        // Already gone counts as deleted
        if resp.status() != reqwest::StatusCode::NOT_FOUND {
            resp.error_for_status()?;
        }
        Ok(())
    }
}

impl Store for HttpStore {
    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        self.get_all("transactions")
    }

    fn load_wage_history(&self) -> Result<Vec<WageRecord>> {
        self.get_all("wages")
    }

    fn load_budgets(&self) -> Result<CategoryBudgets> {
        let docs: Vec<BudgetDoc> = self.get_all("budgets")?;
        let mut budgets = CategoryBudgets::new();
        for d in docs {
            budgets.set(d.category, d.amount)?;
        }
        Ok(budgets)
    }

    fn put_transaction(&self, tx: &Transaction) -> Result<()> {
        self.put("transactions", &tx.id, tx)
    }

    fn delete_transaction(&self, id: &str) -> Result<()> {
        self.delete("transactions", id)
    }

    fn put_wage_record(&self, record: &WageRecord) -> Result<()> {
        self.put("wages", &record.id, record)
    }

    fn put_budget(&self, category: &str, amount: Decimal) -> Result<()> {
        let doc = BudgetDoc {
            category: category.to_string(),
            amount,
        };
        self.put("budgets", category, &doc)
    }

    fn delete_budget(&self, category: &str) -> Result<()> {
        self.delete("budgets", category)
    }
}
