use super::{write_package, xml_text, ExportError, SLIDE_TITLE};

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/></Types>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;

/// Slide geometry in EMU (10in x 7.5in).
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 6_858_000;

struct Frame {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

const TITLE_FRAME: Frame = Frame { x: 457_200, y: 274_638, cx: 8_229_600, cy: 1_143_000 };
const BODY_FRAME: Frame = Frame { x: 457_200, y: 1_600_200, cx: 8_229_600, cy: 4_525_963 };

fn xfrm(frame: &Frame) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )
}

fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        "{}\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        XML_DECL
    );
    for (id, kind, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_NS, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

const EMPTY_GROUP: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// A placeholder shape. `ph` is the `<p:ph .../>` element, `paragraphs` the `<a:p>` list.
fn placeholder(id: u32, name: &str, ph: &str, frame: &Frame, paragraphs: &str) -> String {
    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr>{xfrm}</p:spPr>"#,
            r#"<p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
        ),
        id = id,
        name = name,
        ph = ph,
        xfrm = xfrm(frame),
        paragraphs = paragraphs,
    )
}

fn paragraph(text: &str, size: u32) -> String {
    if text.trim().is_empty() {
        return format!(r#"<a:p><a:endParaRPr lang="en-US" sz="{}"/></a:p>"#, size);
    }
    format!(
        r#"<a:p><a:r><a:rPr lang="en-US" sz="{}" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
        size,
        xml_text(text)
    )
}

fn presentation_xml() -> String {
    format!(
        concat!(
            "{decl}\n<p:presentation {ns} saveSubsetFonts=\"1\">",
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
            r#"<p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst>"#,
            r#"<p:sldSz cx="{cx}" cy="{cy}" type="screen4x3"/><p:notesSz cx="{cy}" cy="{cx}"/>"#,
            "</p:presentation>"
        ),
        decl = XML_DECL,
        ns = NS,
        cx = SLIDE_CX,
        cy = SLIDE_CY,
    )
}

fn slide_master_xml() -> String {
    format!(
        concat!(
            "{decl}\n<p:sldMaster {ns}><p:cSld><p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg>",
            "<p:spTree>{group}</p:spTree></p:cSld>",
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "</p:sldMaster>"
        ),
        decl = XML_DECL,
        ns = NS,
        group = EMPTY_GROUP,
    )
}

fn slide_layout_xml() -> String {
    format!(
        concat!(
            "{decl}\n<p:sldLayout {ns} type=\"obj\" preserve=\"1\"><p:cSld name=\"Title and Content\"><p:spTree>{group}",
            "{title}{body}",
            "</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
        ),
        decl = XML_DECL,
        ns = NS,
        group = EMPTY_GROUP,
        title = placeholder(2, "Title 1", r#"<p:ph type="title"/>"#, &TITLE_FRAME, "<a:p/>"),
        body = placeholder(3, "Content Placeholder 2", r#"<p:ph idx="1"/>"#, &BODY_FRAME, "<a:p/>"),
    )
}

/// The single "Title and Content" slide carrying `text` in its body placeholder.
fn slide_xml(text: &str) -> String {
    let mut body: String = text.lines().map(|line| paragraph(line, 1800)).collect();
    if body.is_empty() {
        body = paragraph("", 1800);
    }

    format!(
        concat!(
            "{decl}\n<p:sld {ns}><p:cSld><p:spTree>{group}{title}{body}</p:spTree></p:cSld>",
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
        ),
        decl = XML_DECL,
        ns = NS,
        group = EMPTY_GROUP,
        title = placeholder(
            2,
            "Title 1",
            r#"<p:ph type="title"/>"#,
            &TITLE_FRAME,
            &paragraph(SLIDE_TITLE, 4000)
        ),
        body = placeholder(3, "Content Placeholder 2", r#"<p:ph idx="1"/>"#, &BODY_FRAME, &body),
    )
}

pub fn render(text: &str) -> Result<Vec<u8>, ExportError> {
    write_package(&[
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        (
            "_rels/.rels",
            relationships(&[("rId1", "officeDocument", "ppt/presentation.xml")]),
        ),
        ("ppt/presentation.xml", presentation_xml()),
        (
            "ppt/_rels/presentation.xml.rels",
            relationships(&[
                ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
                ("rId2", "slide", "slides/slide1.xml"),
                ("rId3", "theme", "theme/theme1.xml"),
            ]),
        ),
        ("ppt/slideMasters/slideMaster1.xml", slide_master_xml()),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            relationships(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ]),
        ),
        ("ppt/slideLayouts/slideLayout1.xml", slide_layout_xml()),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        ),
        ("ppt/slides/slide1.xml", slide_xml(text)),
        (
            "ppt/slides/_rels/slide1.xml.rels",
            relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        ),
        ("ppt/theme/theme1.xml", THEME.to_string()),
    ])
}
