use modlinks::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Read;
use tempfile::tempdir;

struct MapTransport(HashMap<String, Vec<u8>>);

impl Transport for MapTransport {
    fn get(&self, url: &str) -> std::result::Result<Response, TransportError> {
        self.0
            .get(url)
            .map(|body| Response::ok(body.clone()))
            .ok_or_else(|| TransportError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn manifest_xml(name: &str, url: &str, content: &[u8], deps: &[&str]) -> String {
    let deps: String = deps
        .iter()
        .map(|d| format!("<Dependency>{d}</Dependency>"))
        .collect();
    format!(
        "    <Manifest>\n        <Name>{name}</Name>\n        <Description>{name} mod</Description>\n        <Version>1.0.0.0</Version>\n        <Link SHA256=\"{}\"><![CDATA[{url}]]></Link>\n        <Dependencies>{deps}</Dependencies>\n    </Manifest>\n",
        hex::encode(Sha256::digest(content))
    )
}

#[test]
fn test_install_flow_from_document_to_verified_files() {
    let files = [
        ("Randomizer 4", "https://example.com/Randomizer.zip", b"rando".as_slice(), vec!["MenuChanger", "ItemChanger"]),
        ("MenuChanger", "https://example.com/MenuChanger.zip", b"menu".as_slice(), vec![]),
        ("ItemChanger", "https://example.com/ItemChanger.dll", b"items".as_slice(), vec!["Vasi"]),
        ("Benchwarp", "https://example.com/Benchwarp.zip", b"bench".as_slice(), vec![]),
    ];

    let mut document = String::from("<ModLinks>\n");
    let mut bodies = HashMap::new();
    for (name, url, content, deps) in &files {
        document.push_str(&manifest_xml(name, url, content, deps));
        bodies.insert((*url).to_string(), content.to_vec());
    }
    document.push_str("</ModLinks>\n");

    let catalog = parse_catalog(document.as_bytes()).unwrap();
    let names: Vec<&str> = catalog.iter().map(|m| m.name.as_str()).collect();

    let requested = resolve(&names, "random").unwrap();
    assert_eq!(requested, "Randomizer 4");

    let result = closure(&catalog, &[requested]);
    let installed: Vec<&str> = result.names().collect();
    assert_eq!(installed, vec!["Randomizer 4", "MenuChanger", "ItemChanger"]);
    assert_eq!(
        result.missing_error().unwrap().to_string(),
        "required mods do not exist: Vasi"
    );

    let dir = tempdir().unwrap();
    let cache = ContentCache::new(dir.path());
    let transport = MapTransport(bodies);
    for record in &result.records {
        let mut file = cache.fetch(record, Platform::current(), &transport).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        let (_, _, expected, _) = files.iter().find(|f| f.0 == record.name).unwrap();
        assert_eq!(&content, expected);
    }
    assert!(dir.path().join("ItemChanger.dll").exists());
    assert!(dir.path().join("MenuChanger.zip").exists());
    assert!(!dir.path().join("Benchwarp.zip").exists());
}

#[test]
fn test_publish_then_reload() {
    let content = b"new build";
    let document = format!(
        "<ModLinks>\n{}</ModLinks>\n",
        manifest_xml("Vasi", "https://example.com/v1.0/Vasi.zip", b"old build", &[])
    );

    let patch = Manifest {
        version: "1.1.0.0".to_string(),
        link: Some(Link::new(
            "https://example.com/v1.1/Vasi.zip",
            hex::encode(Sha256::digest(content)),
        )),
        ..Default::default()
    };
    let patched = apply(document.as_bytes(), "Vasi", &patch).unwrap();
    let catalog = parse_catalog(&patched).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].version, "1.1.0.0");
    assert_eq!(catalog[0].description, "Vasi mod");
    assert_eq!(catalog[0].dependencies, Some(Vec::new()));

    // The cache now wants the new build.
    let dir = tempdir().unwrap();
    let cache = ContentCache::new(dir.path());
    let transport = MapTransport(HashMap::from([(
        "https://example.com/v1.1/Vasi.zip".to_string(),
        content.to_vec(),
    )]));
    let file = cache.fetch(&catalog[0], Some(Platform::Windows), &transport).unwrap();
    assert_eq!(file.size(), content.len() as u64);
    assert!(file.is_zip());
}

#[test]
fn test_serialize_catalog_parses_back() {
    let catalog = vec![
        Manifest::new("A", Link::new("https://example.com/A.zip", "00")),
        Manifest::new("B", Link::new("https://example.com/B.zip", "11")),
    ];
    let document = serialize_catalog(&catalog).unwrap();
    assert_eq!(parse_catalog(&document).unwrap(), catalog);
    assert_eq!(modlinks::patcher::manifest_spans(&document).len(), 2);
}
