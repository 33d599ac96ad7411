//! Integration model extracted from a decoded manifest

use super::axml::{AttrValue, XmlElement};
use serde::Serialize;
use std::collections::BTreeMap;

const APP_LINK_SCHEMES: &[&str] = &["http", "https"];

/// What the application declares locally about deep linking
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntegrationModel {
    pub package_name: String,
    /// URI scheme -> hosts declared alongside it (empty = any host)
    pub deeplink_schemes: BTreeMap<String, Vec<String>>,
    /// Hosts of `http`/`https` intent filters
    pub applink_hosts: Vec<String>,
    pub meta_data: BTreeMap<String, AttrValue>,
}

impl IntegrationModel {
    pub fn from_document(root: &XmlElement) -> Self {
        let mut model = IntegrationModel {
            package_name: root.attr_str("package").unwrap_or_default().to_string(),
            ..Default::default()
        };

        for element in root.descendants() {
            match element.name.as_str() {
                "intent-filter" => model.add_intent_filter(element),
                "meta-data" => {
                    if let (Some(name), Some(value)) =
                        (element.attr_str("name"), element.attr("value"))
                    {
                        model.meta_data.insert(name.to_string(), value.clone());
                    }
                }
                _ => {}
            }
        }

        model
    }

    // A filter's <data> attributes combine: every scheme pairs with every host
    fn add_intent_filter(&mut self, filter: &XmlElement) {
        let mut schemes: Vec<&str> = Vec::new();
        let mut hosts: Vec<&str> = Vec::new();
        for data in filter.children.iter().filter(|c| c.name == "data") {
            if let Some(scheme) = data.attr_str("scheme").filter(|s| !s.is_empty()) {
                push_unique(&mut schemes, scheme);
            }
            if let Some(host) = data.attr_str("host").filter(|h| !h.is_empty()) {
                push_unique(&mut hosts, host);
            }
        }

        for scheme in schemes {
            if APP_LINK_SCHEMES.contains(&scheme) {
                for host in &hosts {
                    if !self.applink_hosts.iter().any(|h| h == host) {
                        self.applink_hosts.push(host.to_string());
                    }
                }
            } else {
                self.add_scheme_hosts(scheme, &hosts);
            }
        }
    }

    // An empty host list accepts any host and stays empty once recorded
    fn add_scheme_hosts(&mut self, scheme: &str, hosts: &[&str]) {
        match self.deeplink_schemes.get_mut(scheme) {
            Some(declared) if declared.is_empty() => {}
            Some(declared) if hosts.is_empty() => declared.clear(),
            Some(declared) => {
                for host in hosts {
                    if !declared.iter().any(|h| h == host) {
                        declared.push(host.to_string());
                    }
                }
            }
            None => {
                self.deeplink_schemes.insert(
                    scheme.to_string(),
                    hosts.iter().map(|h| h.to_string()).collect(),
                );
            }
        }
    }

    pub fn has_deeplink_schemes(&self) -> bool {
        !self.deeplink_schemes.is_empty()
    }

    pub fn has_applink_hosts(&self) -> bool {
        !self.applink_hosts.is_empty()
    }
}

fn push_unique<'a>(list: &mut Vec<&'a str>, value: &'a str) {
    if !list.contains(&value) {
        list.push(value);
    }
}
