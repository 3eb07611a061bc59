//! The sample graph encoded in one go, checked fixture by fixture.

use dcx::fixtures::{SaveValue, save_values};
use dcx_xml::Result;

const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const ROOT: &str = "http://schemas.datacontract.org/2004/07/";
const ARRAYS: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";
const XSD: &str = "http://www.w3.org/2001/XMLSchema";
const UNITY: &str = "http://schemas.datacontract.org/2004/07/UnityEngine";

fn sample_xml() -> Result<String> {
    dcx_xml::to_xml_string(&save_values(2))
}

/// The `<AsyncSerializer.SaveValue>` entry with the given key.
fn entry(xml: &str, key: &str) -> String {
    let marker = format!("<AsyncSerializer.SaveValue><Key>{key}</Key>");
    let start = xml.find(&marker).unwrap_or_else(|| panic!("no entry {key} in:\n{xml}"));
    let end = xml[start..]
        .find("</AsyncSerializer.SaveValue>")
        .map(|at| start + at + "</AsyncSerializer.SaveValue>".len())
        .expect("entry closed");
    xml[start..end].to_string()
}

fn value_of(xml: &str, key: &str) -> String {
    let entry = entry(xml, key);
    let prefix = format!("<AsyncSerializer.SaveValue><Key>{key}</Key>");
    entry[prefix.len()..entry.len() - "</AsyncSerializer.SaveValue>".len()].to_string()
}

// =============================================================================
// Root
// =============================================================================

#[test]
fn test_root_element() -> Result<()> {
    let xml = sample_xml()?;
    assert!(
        xml.starts_with(&format!(
            r#"<ArrayOfAsyncSerializer.SaveValue xmlns:i="{XSI}" xmlns="{ROOT}"><AsyncSerializer.SaveValue>"#
        )),
        "{xml}"
    );
    assert!(xml.ends_with("</AsyncSerializer.SaveValue></ArrayOfAsyncSerializer.SaveValue>"));
    assert_eq!(xml.matches("<AsyncSerializer.SaveValue>").count(), 11);
    Ok(())
}

// =============================================================================
// Fixtures
// =============================================================================

#[test]
fn test_dictionary_data() -> Result<()> {
    let xml = sample_xml()?;
    assert_eq!(
        value_of(&xml, "DictionaryData"),
        format!(
            concat!(
                r#"<Value i:type="DictionaryData.SaveValues">"#,
                r#"<entries xmlns:d4p1="{arrays}">"#,
                "<d4p1:KeyValueOfintboolean><d4p1:Key>0</d4p1:Key><d4p1:Value>true</d4p1:Value></d4p1:KeyValueOfintboolean>",
                "<d4p1:KeyValueOfintboolean><d4p1:Key>1</d4p1:Key><d4p1:Value>false</d4p1:Value></d4p1:KeyValueOfintboolean>",
                "</entries></Value>"
            ),
            arrays = ARRAYS
        )
    );
    Ok(())
}

#[test]
fn test_empty_array_of_non_contract() -> Result<()> {
    let xml = sample_xml()?;
    assert_eq!(
        value_of(&xml, "EmptyArrayOfNonContract"),
        r#"<Value i:type="EmptyArrayOfNonContract.SaveValues"><contracts/></Value>"#
    );
    Ok(())
}

#[test]
fn test_array_of_int() -> Result<()> {
    let xml = sample_xml()?;
    assert_eq!(
        value_of(&xml, "ArrayOfInt"),
        format!(r#"<Value xmlns:d3p1="{ARRAYS}" i:type="d3p1:ArrayOfint"><d3p1:int>1</d3p1:int></Value>"#)
    );
    Ok(())
}

#[test]
fn test_array_of_null() -> Result<()> {
    let xml = sample_xml()?;
    assert_eq!(
        value_of(&xml, "ArrayOfNull"),
        r#"<Value i:type="ArrayOfVector"><Vector i:nil="true"/></Value>"#
    );
    Ok(())
}

#[test]
fn test_bool_as_string() -> Result<()> {
    let xml = sample_xml()?;
    assert_eq!(
        value_of(&xml, "BoolAsString"),
        format!(r#"<Value xmlns:d3p1="{XSD}" i:type="d3p1:string">False</Value>"#)
    );
    Ok(())
}

#[test]
fn test_vector() -> Result<()> {
    let xml = sample_xml()?;
    assert_eq!(
        value_of(&xml, "Vector"),
        format!(
            r#"<Value xmlns:d3p1="{UNITY}" i:type="d3p1:Vector3"><d3p1:x>1</d3p1:x><d3p1:y>2</d3p1:y><d3p1:z>3</d3p1:z></Value>"#
        )
    );
    Ok(())
}

#[test]
fn test_container_lists() -> Result<()> {
    let xml = sample_xml()?;
    assert!(
        xml.contains(concat!(
            "<Key>ContainerList</Key>",
            r#"<Value i:type="ArrayOfContainerList.SaveValues"/>"#
        )),
        "{xml}"
    );
    assert!(
        xml.contains(concat!(
            "<Key>ContainerList</Key>",
            r#"<Value i:type="ArrayOfContainerList.SaveValues">"#,
            "<ContainerList.SaveValues><alpha>1</alpha><beta>1</beta><gamma>1</gamma></ContainerList.SaveValues>",
            "</Value>"
        )),
        "{xml}"
    );
    Ok(())
}

#[test]
fn test_empty_container() -> Result<()> {
    let xml = sample_xml()?;
    let expected = format!(
        concat!(
            "<Key>Container</Key>",
            r#"<Value i:type="Container.SaveValues">"#,
            "<alpha>1</alpha><beta>0</beta><condition>false</condition><contracts/><gamma>0</gamma>",
            r#"<list xmlns:d4p1="{arrays}"/><nil i:nil="true"/><phi>1</phi><secret>0</secret>"#,
            r#"<vector xmlns:d4p1="{unity}"><d4p1:x>0</d4p1:x><d4p1:y>0</d4p1:y><d4p1:z>0</d4p1:z></vector>"#,
            r#"<vectors xmlns:d4p1="{unity}"/>"#,
            "</Value>"
        ),
        arrays = ARRAYS,
        unity = UNITY
    );
    assert!(xml.contains(&expected), "{xml}");
    Ok(())
}

#[test]
fn test_container_of_one() -> Result<()> {
    let xml = sample_xml()?;
    let expected = format!(
        concat!(
            "<alpha>0.5</alpha><beta>1</beta><condition>true</condition>",
            "<contracts><ContractType><alpha>0</alpha></ContractType></contracts>",
            "<gamma>1</gamma>",
            r#"<list xmlns:d4p1="{arrays}"><d4p1:string>0</d4p1:string></list>"#,
            r#"<nil i:nil="true"/><phi>0.5</phi><secret>1</secret>"#,
            r#"<vector xmlns:d4p1="{unity}"><d4p1:x>1</d4p1:x><d4p1:y>1</d4p1:y><d4p1:z>1</d4p1:z></vector>"#,
            r#"<vectors xmlns:d4p1="{unity}"><d4p1:Vector3><d4p1:x>0</d4p1:x><d4p1:y>0</d4p1:y><d4p1:z>0</d4p1:z></d4p1:Vector3></vectors>"#,
        ),
        arrays = ARRAYS,
        unity = UNITY
    );
    assert!(xml.contains(&expected), "{xml}");
    Ok(())
}

#[test]
fn test_container_of_two_fractions() -> Result<()> {
    let xml = sample_xml()?;
    assert!(xml.contains("<alpha>0.3333333333333333</alpha>"), "{xml}");
    assert!(xml.contains("<phi>0.33333334</phi>"), "{xml}");
    Ok(())
}

#[test]
fn test_every_entry_is_a_save_value() {
    let graph: Vec<SaveValue> = save_values(0);
    assert_eq!(graph.len(), 9);
    assert_eq!(graph.last().map(SaveValue::key), Some("Container"));
}
