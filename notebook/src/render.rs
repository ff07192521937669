//! Server-rendered HTML for the notebook and sign-in pages.

use notebook_types::ViewSnapshot;

const STYLE: &str = "
body { font-family: sans-serif; background: #fff5f5; margin: 0; }
main { display: flex; flex-direction: column; align-items: center; padding: 1rem; }
h1 { font-family: monospace; font-size: 2.5rem; }
.greeting { align-self: stretch; display: flex; justify-content: flex-end; gap: .5rem; align-items: center; }
.notice { color: #9b2c2c; margin-bottom: .5rem; }
form.inline { display: inline; margin: 0; }
input[type=text], input[type=password] { padding: .5rem; font-size: 1.25rem; }
button { padding: .5rem; font-size: 1.25rem; cursor: pointer; }
ul { list-style: none; padding: 0; }
li { display: flex; align-items: center; }
li button.note { background: none; border: none; font-size: 1.5rem; text-align: left; }
li button.delete { background: none; border: none; }
";

/// Escape text for HTML bodies and attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n{}</main>\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn notice_html(notice: Option<&str>) -> String {
    match notice {
        Some(msg) => format!("<p class=\"notice\" role=\"alert\">{}</p>\n", escape_html(msg)),
        None => String::new(),
    }
}

/// The notebook: greeting, note form and note list.
pub fn notebook_page(username: &str, view: &ViewSnapshot, notice: Option<&str>) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<div class=\"greeting\"><span>Hello, {}</span>\
         <form class=\"inline\" method=\"post\" action=\"/logout\"><button type=\"submit\">Sign Out</button></form></div>\n",
        escape_html(username)
    ));
    body.push_str("<h1>Notebook</h1>\n");
    body.push_str(&notice_html(notice));

    let label = if view.edit_buffer.is_creating() {
        "Add Note"
    } else {
        "Update Note"
    };
    let disabled = if view.busy { " disabled" } else { "" };
    body.push_str(&format!(
        "<form method=\"post\" action=\"/notes\">\
         <input type=\"text\" name=\"text\" placeholder=\"Write your note\" value=\"{}\" autofocus>\
         <button type=\"submit\"{}>{}</button></form>\n",
        escape_html(&view.edit_buffer.text),
        disabled,
        label
    ));

    if view.busy {
        body.push_str("<div>Loading notes ...</div>\n");
    } else {
        body.push_str("<ul>\n");
        for note in &view.notes {
            let id = urlencoding::encode(&note.id);
            body.push_str(&format!(
                "<li><form class=\"inline\" method=\"post\" action=\"/notes/{id}/select\">\
                 <button class=\"note\" type=\"submit\">{text}</button></form>\
                 <form class=\"inline\" method=\"post\" action=\"/notes/{id}/delete\">\
                 <button class=\"delete\" type=\"submit\" aria-label=\"Delete\">&times;</button></form></li>\n",
                id = escape_html(&id),
                text = escape_html(&note.text),
            ));
        }
        body.push_str("</ul>\n");
    }

    page("Notebook", &body)
}

/// Sign-in form shown until the identity gate passes.
pub fn login_page(username: &str, notice: Option<&str>) -> String {
    let body = format!(
        "<h1>Notebook</h1>\n{}\
         <form method=\"post\" action=\"/login\">\
         <p><input type=\"text\" name=\"username\" placeholder=\"Username\" value=\"{}\" autofocus></p>\
         <p><input type=\"password\" name=\"password\" placeholder=\"Password\"></p>\
         <p><button type=\"submit\">Sign In</button></p></form>\n",
        notice_html(notice),
        escape_html(username)
    );
    page("Sign in - Notebook", &body)
}
