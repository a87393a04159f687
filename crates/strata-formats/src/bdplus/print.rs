//! SVM report rendering

use super::Svm;
use crate::cursor::Encoding;
use crate::printer::Report;

pub(crate) fn print(builder: &mut String, svm: &Svm) {
    let mut report = Report::new(builder);
    report.title("BD+ SVM Information:");
    report.blank();

    let mut section = report.indented();
    section.section("Header Information:", "No header", svm.header.as_ref(), |r, header| {
        r.field("Signature", &Encoding::Ascii.decode(&header.signature));
        r.field("Unknown 1", &header.unknown_1);
        r.field("Year", &header.year);
        r.field("Month", &header.month);
        r.field("Day", &header.day);
        r.field("Date", &header.date());
        r.field("Unknown 2", &header.unknown_2);
        r.field("Length", &header.length);
    });

    section.section("Code Data Information:", "No code data", svm.data.as_ref(), |r, data| {
        r.field("Size", &(data.len() as u64));
        r.line("Data: [Code data not printed]");
    });
}
