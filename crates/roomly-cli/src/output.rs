//! Plain-text rendering for records.

use roomly_core::{Property, User};

/// Print a listing table, one row per listing.
pub fn print_properties(properties: &[Property]) {
    if properties.is_empty() {
        println!("No listings found");
        return;
    }

    println!(
        "{:<12} {:<28} {:<20} {:>10} {:<8} {}",
        "ID", "TITLE", "LOCATION", "BUDGET", "GENDER", "OWNER"
    );
    for p in properties {
        println!(
            "{:<12} {:<28} {:<20} {:>10.2} {:<8} {}",
            p.id, p.title, p.location, p.budget, p.preferred_gender, p.user_id
        );
    }
}

/// Print one listing in full.
pub fn print_property(p: &Property) {
    println!("id:        {}", p.id);
    println!("title:     {}", p.title);
    println!("location:  {}", p.location);
    println!("budget:    {:.2}", p.budget);
    println!("gender:    {}", p.preferred_gender);
    println!("owner:     {}", p.user_id);
    println!("description:");
    println!("{}", p.description);
}

/// Print a user table, one row per account.
pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users");
        return;
    }

    println!("{:<12} {:<20} {:<30} {}", "ID", "USERNAME", "EMAIL", "ROLE");
    for u in users {
        println!(
            "{:<12} {:<20} {:<30} {}",
            u.id, u.username, u.email, u.role
        );
    }
}

/// Print one account in full.
pub fn print_user(u: &User) {
    println!("username:  {}", u.username);
    println!("email:     {}", u.email);
    println!("role:      {}", u.role);
    if let Some(phone) = &u.phone_number {
        println!("phone:     {phone}");
    }
    if let Some(location) = &u.preferred_location {
        println!("location:  {location}");
    }
    if let Some(budget) = u.budget {
        println!("budget:    {budget:.2}");
    }
    if let Some(gender) = u.preferred_gender {
        println!("gender:    {gender}");
    }
}
