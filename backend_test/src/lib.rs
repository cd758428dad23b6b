use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one and inject
/// dependencies.
///
/// Every test gets a fresh in-memory store holding the example candidates
/// `A`, `B` and `C` (IDs 1 to 3), and a tracked client for a rocket over that
/// store. With `#[backend_test(user)]` the example user is registered (ID 1)
/// and the client is logged in as them.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`] and
/// `crate::model::Store`.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract type information and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Log in the client as the example user if needed.
    let maybe_login = match parse_macro_input!(args as Option<Ident>) {
        None => quote! {},
        Some(arg) if arg == "user" => quote! {
            let user = store
                .users
                .insert(crate::model::db::UserCore::example())
                .await
                .unwrap();
            let body = format!(
                "email={}&password={}",
                user.email,
                crate::model::db::user::examples::EXAMPLE_PASSWORD.replace(' ', "+"),
            );
            let status = rocket_client
                .post("/login")
                .header(rocket::http::ContentType::Form)
                .body(body)
                .dispatch()
                .await
                .status();
            assert_eq!(rocket::http::Status::SeeOther, status, "example user failed to log in");
        },
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected no argument or `user`")
                .into_compile_error()
                .into();
        }
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup() -> (rocket::local::asynchronous::Client, crate::model::Store) {
                let store = crate::model::Store::memory();
                for candidate in crate::model::db::CandidateCore::examples() {
                    store.candidates.insert(candidate).await.unwrap();
                }
                let rocket_client = rocket::local::asynchronous::Client::tracked(crate::rocket_for_store(store.clone()))
                    .await
                    .unwrap();

                #maybe_login

                (rocket_client, store)
            }

            /// The test itself.
            #item_fn

            // The store lives in memory, so there is nothing to clean up
            // and a single runtime is enough.
            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                #[allow(unused_variables)]
                let (rocket_client, store) = setup().await;
                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_store = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                // Valid as the last path segment for any type is itself
                if let Some(segment) = type_path.path.segments.last() {
                    if segment.ident == "Client" {
                        if has_client {
                            return Err(syn::Error::new(input.span(), "Test cannot accept more than one `rocket::local::asynchronous::Client`"));
                        }
                        has_client = true;
                        args.push(quote! { rocket_client });
                        continue;
                    } else if segment.ident == "Store" {
                        if has_store {
                            return Err(syn::Error::new(
                                input.span(),
                                "Test cannot accept more than one `Store`",
                            ));
                        }
                        has_store = true;
                        args.push(quote! { store.clone() });
                        continue;
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client` or `store_ident: Store`",
        ));
    }

    Ok(args)
}
