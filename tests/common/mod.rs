//! Shared builders for compiled manifests, resource tables and packages

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";
pub const NO_INDEX: u32 = 0xFFFF_FFFF;
pub const SDK_DEX: &[u8] = b"dex\n035\0....Lio/branch/referral/Branch;....";
pub const PLAIN_DEX: &[u8] = b"dex\n035\0....Lcom/example/shop/MainActivity;....";

/// Route log output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const TYPE_REFERENCE: u8 = 0x01;
const TYPE_STRING: u8 = 0x03;
const TYPE_INT_DEC: u8 = 0x10;
const TYPE_INT_BOOLEAN: u8 = 0x12;

/// Framework attributes whose names can be stripped and recovered
const KNOWN_ATTRS: &[(&str, u32)] = &[
    ("name", 0x0101_0003),
    ("value", 0x0101_0024),
    ("scheme", 0x0101_0027),
    ("host", 0x0101_0028),
];

#[derive(Debug, Clone)]
pub enum Val {
    Str(String),
    Bool(bool),
    Ref(u32),
    Int(i32),
}

pub fn s(v: &str) -> Val {
    Val::Str(v.to_string())
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub attrs: Vec<(String, Val)>,
    pub children: Vec<Node>,
}

pub fn el(name: &str, attrs: Vec<(&str, Val)>, children: Vec<Node>) -> Node {
    Node {
        name: name.to_string(),
        attrs: attrs.into_iter().map(|(n, v)| (n.to_string(), v)).collect(),
        children,
    }
}

pub fn data(scheme: Option<&str>, host: Option<&str>) -> Node {
    let mut attrs = Vec::new();
    if let Some(scheme) = scheme {
        attrs.push(("scheme", s(scheme)));
    }
    if let Some(host) = host {
        attrs.push(("host", s(host)));
    }
    el("data", attrs, vec![])
}

pub fn intent_filter(data_nodes: Vec<Node>) -> Node {
    let mut children = vec![
        el("action", vec![("name", s("android.intent.action.VIEW"))], vec![]),
        el("category", vec![("name", s("android.intent.category.DEFAULT"))], vec![]),
        el("category", vec![("name", s("android.intent.category.BROWSABLE"))], vec![]),
    ];
    children.extend(data_nodes);
    el("intent-filter", vec![], children)
}

pub fn meta_data(name: &str, value: Val) -> Node {
    el("meta-data", vec![("name", s(name)), ("value", value)], vec![])
}

pub fn manifest(package: &str, filters: Vec<Node>, meta: Vec<Node>) -> Node {
    let mut app_children = vec![el(
        "activity",
        vec![("name", s(".MainActivity"))],
        filters,
    )];
    app_children.extend(meta);
    el(
        "manifest",
        vec![("package", s(package))],
        vec![
            el("uses-permission", vec![("name", s("android.permission.INTERNET"))], vec![]),
            el("application", vec![("name", s(".ShopApplication"))], app_children),
        ],
    )
}

/// A typical fully integrated app
pub fn shop_manifest() -> Node {
    manifest(
        "com.example.shop",
        vec![
            intent_filter(vec![data(Some("shop"), Some("open"))]),
            intent_filter(vec![
                data(Some("https"), None),
                data(None, Some("shop.app.link")),
                data(None, Some("shop-alternate.app.link")),
            ]),
        ],
        vec![
            meta_data("io.branch.sdk.BranchKey", s("key_live_shop123")),
            meta_data("io.branch.sdk.BranchKey.test", s("key_test_shop456")),
            meta_data("io.branch.sdk.TestMode", Val::Bool(false)),
        ],
    )
}

// ---------------------------------------------------------------------------
// String pools
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Interner {
    strings: Vec<String>,
    index: HashMap<String, u32>,
}

impl Interner {
    fn intern(&mut self, value: &str) -> u32 {
        if let Some(i) = self.index.get(value) {
            return *i;
        }
        self.push_unindexed(value);
        let i = self.strings.len() as u32 - 1;
        self.index.insert(value.to_string(), i);
        i
    }

    fn push_unindexed(&mut self, value: &str) -> u32 {
        self.strings.push(value.to_string());
        self.strings.len() as u32 - 1
    }
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn string_pool(strings: &[String], utf8: bool) -> Vec<u8> {
    let mut body = Vec::new();
    let mut offsets = Vec::new();
    for s in strings {
        offsets.push(body.len() as u32);
        if utf8 {
            let chars = s.encode_utf16().count();
            assert!(chars < 0x80 && s.len() < 0x80, "test strings stay short");
            body.push(chars as u8);
            body.push(s.len() as u8);
            body.extend_from_slice(s.as_bytes());
            body.push(0);
        } else {
            let units: Vec<u16> = s.encode_utf16().collect();
            push_u16(&mut body, units.len() as u16);
            for u in units {
                push_u16(&mut body, u);
            }
            push_u16(&mut body, 0);
        }
    }
    while body.len() % 4 != 0 {
        body.push(0);
    }

    let strings_start = 28 + offsets.len() * 4;
    let mut out = Vec::new();
    push_u16(&mut out, 0x0001);
    push_u16(&mut out, 28);
    push_u32(&mut out, (strings_start + body.len()) as u32);
    push_u32(&mut out, strings.len() as u32);
    push_u32(&mut out, 0);
    push_u32(&mut out, if utf8 { 1 << 8 } else { 0 });
    push_u32(&mut out, strings_start as u32);
    push_u32(&mut out, 0);
    for o in offsets {
        push_u32(&mut out, o);
    }
    out.extend_from_slice(&body);
    out
}

// ---------------------------------------------------------------------------
// Binary XML
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct AxmlOptions {
    pub utf8: bool,
    /// Write empty names for framework attributes, leaving only the resource map
    pub strip_attr_names: bool,
}

pub fn encode_axml(root: &Node, options: AxmlOptions) -> Vec<u8> {
    let mut pool = Interner::default();
    let mut attr_names: HashMap<String, u32> = HashMap::new();
    let mut resource_map = Vec::new();

    if options.strip_attr_names {
        for (name, id) in KNOWN_ATTRS {
            let index = pool.push_unindexed("");
            attr_names.insert(name.to_string(), index);
            resource_map.push(*id);
        }
    }
    let ns_uri = pool.intern(ANDROID_NS);
    let ns_prefix = pool.intern("android");
    intern_node(root, &mut pool, &mut attr_names);

    let mut body = Vec::new();
    body.extend_from_slice(&string_pool(&pool.strings, options.utf8));

    if !resource_map.is_empty() {
        push_u16(&mut body, 0x0180);
        push_u16(&mut body, 8);
        push_u32(&mut body, 8 + 4 * resource_map.len() as u32);
        for id in &resource_map {
            push_u32(&mut body, *id);
        }
    }

    namespace_chunk(&mut body, 0x0100, ns_prefix, ns_uri);
    write_node(&mut body, root, &pool, &attr_names, ns_uri);
    namespace_chunk(&mut body, 0x0101, ns_prefix, ns_uri);

    let mut out = Vec::new();
    push_u16(&mut out, 0x0003);
    push_u16(&mut out, 8);
    push_u32(&mut out, 8 + body.len() as u32);
    out.extend_from_slice(&body);
    out
}

fn intern_node(node: &Node, pool: &mut Interner, attr_names: &mut HashMap<String, u32>) {
    pool.intern(&node.name);
    for (name, value) in &node.attrs {
        if !attr_names.contains_key(name) {
            let index = pool.intern(name);
            attr_names.insert(name.clone(), index);
        }
        if let Val::Str(v) = value {
            pool.intern(v);
        }
    }
    for child in &node.children {
        intern_node(child, pool, attr_names);
    }
}

fn namespace_chunk(out: &mut Vec<u8>, kind: u16, prefix: u32, uri: u32) {
    push_u16(out, kind);
    push_u16(out, 16);
    push_u32(out, 24);
    push_u32(out, 1);
    push_u32(out, NO_INDEX);
    push_u32(out, prefix);
    push_u32(out, uri);
}

fn write_node(
    out: &mut Vec<u8>,
    node: &Node,
    pool: &Interner,
    attr_names: &HashMap<String, u32>,
    ns_uri: u32,
) {
    let name = pool.index[&node.name];

    push_u16(out, 0x0102);
    push_u16(out, 16);
    push_u32(out, 16 + 20 + 20 * node.attrs.len() as u32);
    push_u32(out, 1);
    push_u32(out, NO_INDEX);
    push_u32(out, NO_INDEX);
    push_u32(out, name);
    push_u16(out, 20);
    push_u16(out, 20);
    push_u16(out, node.attrs.len() as u16);
    push_u16(out, 0);
    push_u16(out, 0);
    push_u16(out, 0);

    for (attr_name, value) in &node.attrs {
        let ns = if attr_name == "package" { NO_INDEX } else { ns_uri };
        push_u32(out, ns);
        push_u32(out, attr_names[attr_name]);
        let (raw, data_type, data) = match value {
            Val::Str(v) => {
                let i = pool.index[v];
                (i, TYPE_STRING, i)
            }
            Val::Bool(b) => (NO_INDEX, TYPE_INT_BOOLEAN, if *b { 0xFFFF_FFFF } else { 0 }),
            Val::Ref(id) => (NO_INDEX, TYPE_REFERENCE, *id),
            Val::Int(i) => (NO_INDEX, TYPE_INT_DEC, *i as u32),
        };
        push_u32(out, raw);
        push_u16(out, 8);
        out.push(0);
        out.push(data_type);
        push_u32(out, data);
    }

    for child in &node.children {
        write_node(out, child, pool, attr_names, ns_uri);
    }

    push_u16(out, 0x0103);
    push_u16(out, 16);
    push_u32(out, 24);
    push_u32(out, 1);
    push_u32(out, NO_INDEX);
    push_u32(out, NO_INDEX);
    push_u32(out, name);
}

// ---------------------------------------------------------------------------
// Resource table
// ---------------------------------------------------------------------------

pub const PACKAGE_ID: u32 = 0x7f;
const CONFIG_SIZE: u32 = 64;

/// Builds a single-package resource table with one default configuration
#[derive(Default)]
pub struct ArscBuilder {
    types: Vec<String>,
    entries: Vec<(usize, String, Val)>,
}

impl ArscBuilder {
    /// Add an entry, returning its resource id
    pub fn add(&mut self, type_name: &str, key: &str, value: Val) -> u32 {
        let type_index = match self.types.iter().position(|t| t == type_name) {
            Some(i) => i,
            None => {
                self.types.push(type_name.to_string());
                self.types.len() - 1
            }
        };
        let entry_index = self.entries.iter().filter(|(t, _, _)| *t == type_index).count();
        self.entries.push((type_index, key.to_string(), value));
        (PACKAGE_ID << 24) | (((type_index + 1) as u32) << 16) | entry_index as u32
    }

    pub fn build(&self) -> Vec<u8> {
        let mut values = Interner::default();
        let mut keys = Interner::default();
        for (_, key, value) in &self.entries {
            keys.intern(key);
            if let Val::Str(v) = value {
                values.intern(v);
            }
        }

        let type_pool = string_pool(&self.types, true);
        let key_pool = string_pool(&keys.strings, true);

        let mut package_body = Vec::new();
        package_body.extend_from_slice(&type_pool);
        package_body.extend_from_slice(&key_pool);

        for (type_index, _) in self.types.iter().enumerate() {
            let entries: Vec<&(usize, String, Val)> =
                self.entries.iter().filter(|(t, _, _)| *t == type_index).collect();
            let header_size = 20 + CONFIG_SIZE;
            let entries_start = header_size + 4 * entries.len() as u32;
            let size = entries_start + 16 * entries.len() as u32;

            push_u16(&mut package_body, 0x0201);
            push_u16(&mut package_body, header_size as u16);
            push_u32(&mut package_body, size);
            package_body.push((type_index + 1) as u8);
            package_body.push(0);
            push_u16(&mut package_body, 0);
            push_u32(&mut package_body, entries.len() as u32);
            push_u32(&mut package_body, entries_start);
            push_u32(&mut package_body, CONFIG_SIZE);
            package_body.extend(std::iter::repeat_n(0u8, CONFIG_SIZE as usize - 4));

            for i in 0..entries.len() {
                push_u32(&mut package_body, 16 * i as u32);
            }
            for (_, key, value) in entries {
                push_u16(&mut package_body, 8);
                push_u16(&mut package_body, 0);
                push_u32(&mut package_body, keys.index[key]);
                let (data_type, data) = match value {
                    Val::Str(v) => (TYPE_STRING, values.index[v]),
                    Val::Bool(b) => (TYPE_INT_BOOLEAN, if *b { 0xFFFF_FFFF } else { 0 }),
                    Val::Ref(id) => (TYPE_REFERENCE, *id),
                    Val::Int(i) => (TYPE_INT_DEC, *i as u32),
                };
                push_u16(&mut package_body, 8);
                package_body.push(0);
                package_body.push(data_type);
                push_u32(&mut package_body, data);
            }
        }

        let package_header_size: u32 = 288;
        let mut package = Vec::new();
        push_u16(&mut package, 0x0200);
        push_u16(&mut package, package_header_size as u16);
        push_u32(&mut package, package_header_size + package_body.len() as u32);
        push_u32(&mut package, PACKAGE_ID);
        let mut name_units: Vec<u16> = "com.example.shop".encode_utf16().collect();
        name_units.resize(128, 0);
        for u in name_units {
            push_u16(&mut package, u);
        }
        push_u32(&mut package, package_header_size);
        push_u32(&mut package, self.types.len() as u32);
        push_u32(&mut package, package_header_size + type_pool.len() as u32);
        push_u32(&mut package, keys.strings.len() as u32);
        push_u32(&mut package, 0);
        package.extend_from_slice(&package_body);

        let value_pool = string_pool(&values.strings, false);
        let mut out = Vec::new();
        push_u16(&mut out, 0x0002);
        push_u16(&mut out, 12);
        push_u32(&mut out, 12 + value_pool.len() as u32 + package.len() as u32);
        push_u32(&mut out, 1);
        out.extend_from_slice(&value_pool);
        out.extend_from_slice(&package);
        out
    }
}

// ---------------------------------------------------------------------------
// Packages
// ---------------------------------------------------------------------------

pub fn write_apk(dir: &Path, name: &str, files: &[(&str, Vec<u8>)]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).expect("create apk");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (entry, bytes) in files {
        zip.start_file(*entry, options).expect("start entry");
        zip.write_all(bytes).expect("write entry");
    }
    zip.finish().expect("finish apk");
    path
}

/// Package with the given manifest, an SDK-bearing dex and optional resources
pub fn build_apk(dir: &Path, root: &Node, resources: Option<Vec<u8>>) -> PathBuf {
    let mut files = vec![
        ("AndroidManifest.xml", encode_axml(root, AxmlOptions::default())),
        ("classes.dex", PLAIN_DEX.to_vec()),
        ("classes2.dex", SDK_DEX.to_vec()),
    ];
    if let Some(table) = resources {
        files.push(("resources.arsc", table));
    }
    write_apk(dir, "app-release.apk", &files)
}
