//! Handlebars templates for notification emails. Everything in a
//! submission is user supplied, so templates rely on the default HTML
//! escaping and strict mode catches typos in field names.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug, Clone, Copy)]
pub enum Template {
    ContactEmail,
    TestimonialEmail,
    BookingEmail,
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const CONTACT_EMAIL: &str = r"
<h2>New inquiry from {{name}}</h2>
<p><strong>Email:</strong> {{email}}</p>
{{#if company}}<p><strong>Company:</strong> {{company}}</p>{{/if}}
{{#if message}}<p><strong>Message:</strong></p>
<p>{{message}}</p>{{/if}}
<p><small>Submitted {{submitted_at}}</small></p>
";

const TESTIMONIAL_EMAIL: &str = r"
<h2>New testimonial from {{name}}</h2>
{{#if role}}<p><strong>Role:</strong> {{role}}</p>{{/if}}
{{#if company}}<p><strong>Company:</strong> {{company}}</p>{{/if}}
{{#if rating}}<p><strong>Rating:</strong> {{rating}}/5</p>{{/if}}
<blockquote>{{quote}}</blockquote>
<p><small>Submitted {{submitted_at}}</small></p>
";

const BOOKING_EMAIL: &str = r#"
<h2>{{name}} booked a consultation</h2>
<p><strong>When:</strong> {{starts}}</p>
<p><strong>Email:</strong> {{email}}</p>
{{#if company}}<p><strong>Company:</strong> {{company}}</p>{{/if}}
{{#if meeting_link}}<p><strong>Meeting link:</strong> <a href="{{meeting_link}}">{{meeting_link}}</a></p>{{/if}}
{{#if message}}<p><strong>Message:</strong></p>
<p>{{message}}</p>{{/if}}
<p><small>Calendar event {{event_id}}</small></p>
"#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(&Template::ContactEmail.to_string(), CONTACT_EMAIL)
        .expect("Failed to register template");
    registry
        .register_template_string(&Template::TestimonialEmail.to_string(), TESTIMONIAL_EMAIL)
        .expect("Failed to register template");
    registry
        .register_template_string(&Template::BookingEmail.to_string(), BOOKING_EMAIL)
        .expect("Failed to register template");
    registry
}
