use pubharvest_core::MemorySink;
use pubharvest_pubmed::{ArticleStream, extract};

/// Synthetic `PubmedArticleSet` with `n` articles; every 10th lacks an abstract.
fn synthetic_doc(n: usize) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?><PubmedArticleSet>"#);
    for i in 0..n {
        let abstract_xml = if i % 10 == 0 {
            String::new()
        } else {
            format!(
                "<Abstract><AbstractText Label=\"BACKGROUND\">Background {i} &amp; aims.</AbstractText>\
                 <AbstractText Label=\"RESULTS\">Results {i}.</AbstractText></Abstract>"
            )
        };
        xml.push_str(&format!(
            "<PubmedArticle><MedlineCitation Status=\"MEDLINE\" Owner=\"NLM\">\
             <PMID Version=\"1\">{i}</PMID><Article PubModel=\"Print\">\
             <Journal><ISSN IssnType=\"Print\">0000-0000</ISSN>\
             <JournalIssue CitedMedium=\"Print\"><Volume>1</Volume>\
             <PubDate><Year>20{:02}</Year><Month>Jan</Month></PubDate></JournalIssue>\
             <Title>Journal {}</Title></Journal>\
             <ArticleTitle>Title of article <i>{i}</i></ArticleTitle>{abstract_xml}\
             <AuthorList><Author><LastName>Doe</LastName><ForeName>J</ForeName></Author></AuthorList>\
             </Article></MedlineCitation>\
             <PubmedData><ArticleIdList><ArticleId IdType=\"pubmed\">{i}</ArticleId></ArticleIdList></PubmedData>\
             </PubmedArticle>",
            i % 25,
            i % 7
        ));
    }
    xml.push_str("</PubmedArticleSet>");
    xml
}

#[divan::bench(args = [1_000, 10_000])]
fn stream_articles(bencher: divan::Bencher, n: usize) {
    let doc = synthetic_doc(n);
    bencher.bench(|| ArticleStream::from_xml(&doc).filter_map(Result::ok).count());
}

#[divan::bench(args = [1_000, 10_000])]
fn extract_into_memory(bencher: divan::Bencher, n: usize) {
    let doc = synthetic_doc(n);
    bencher.bench(|| {
        let mut sink = MemorySink::new();
        extract(ArticleStream::from_xml(&doc), &mut sink).unwrap()
    });
}

fn main() {
    divan::main();
}
